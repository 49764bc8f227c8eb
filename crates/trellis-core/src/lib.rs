//! Denormalized nesting index maintenance over a DAG of hierarchical
//! documents.
//!
//! Only direct parent relationships are authoritative (the "preservation"
//! layer); this crate recomputes the derived "index" layer that carries, per
//! document, every root-to-node pathname, every ancestor path-prefix, and
//! the direct parent ids: the materialized-path data a search backend uses
//! to answer "is X nested under Y" without graph traversal at query time.

pub mod adapter;
pub mod builder;
pub mod config;
pub mod documents;
pub mod error;
pub mod indexer;

mod reindex;

pub use adapter::{Extent, InMemoryAdapter, NestingAdapter};
pub use builder::NestingAttributes;
pub use config::{IndexerConfig, DEFAULT_MAXIMUM_NESTING_DEPTH};
pub use documents::{IndexDocument, PreservationDocument, PATHNAME_DELIMITER};
pub use error::{IndexerError, IndexerResult};
pub use indexer::NestingIndexer;
