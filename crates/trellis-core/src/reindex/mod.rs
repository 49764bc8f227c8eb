//! Reindexing Engines
//!
//! The two traversal engines behind [`NestingIndexer`]: the relationship
//! reindexer (one id and its descendants, breadth-first) and the repository
//! reindexer (whole-graph rebuild, parents seeded before children). Both are
//! crate-internal; callers go through the facade.
//!
//! [`NestingIndexer`]: crate::NestingIndexer

mod relationship;
mod repository;

pub(crate) use relationship::RelationshipReindexer;
pub(crate) use repository::RepositoryReindexer;
