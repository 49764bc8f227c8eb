//! Adapter Boundary
//!
//! The engine performs all of its I/O through the [`NestingAdapter`] trait:
//! reads against the preservation layer (authoritative parent relationships)
//! and reads/writes against the index layer (derived nesting data). Real
//! deployments implement this over their search and storage backends; the
//! [`InMemoryAdapter`] is a reference implementation used throughout tests.
//!
//! The trait is deliberately synchronous. The engine is a single-threaded,
//! cooperative traversal that blocks on each storage call; there is no
//! interleaving between reindex operations.

pub mod memory;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::documents::{IndexDocument, PreservationDocument};
use crate::error::IndexerResult;

pub use memory::InMemoryAdapter;

// ============================================================================
// Extent
// ============================================================================

/// Opaque hint forwarded to the adapter when enumerating children
///
/// Backends may use the hint to limit how far a child enumeration reaches
/// (for example, restricting a targeted reindex to directly held members).
/// The engine never inspects the value; it only passes it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent(String);

impl Extent {
    /// The extent used for full reindexing
    pub fn full() -> Self {
        Self("full".to_string())
    }

    /// Create an adapter-defined extent hint
    pub fn new(hint: impl Into<String>) -> Self {
        Self(hint.into())
    }

    /// The raw hint string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::full()
    }
}

// ============================================================================
// NestingAdapter Trait
// ============================================================================

/// The fixed capability set the reindexing engine depends on
///
/// Implementations own durability, lookup, and child enumeration; the engine
/// owns traversal order, cycle detection, and the recomputation of nesting
/// data. An implementation must satisfy two contracts:
///
/// - `write_index_document` fully replaces any prior record for that id.
/// - `child_index_documents` returns every index record whose `parent_ids`
///   contain the given document's id (subject to the extent hint).
pub trait NestingAdapter: Send + Sync {
    /// Find the preservation document for the given id
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::PreservationDocumentNotFound`] when the
    /// preservation layer has no such document.
    ///
    /// [`IndexerError::PreservationDocumentNotFound`]: crate::IndexerError::PreservationDocumentNotFound
    fn find_preservation_document(&self, id: &str) -> IndexerResult<PreservationDocument>;

    /// Find the index document for the given id
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::IndexDocumentNotFound`] when the index layer
    /// has no such document.
    ///
    /// [`IndexerError::IndexDocumentNotFound`]: crate::IndexerError::IndexDocumentNotFound
    fn find_index_document(&self, id: &str) -> IndexerResult<IndexDocument>;

    /// Enumerate every preservation document as an `(id, parent_ids)` pair
    ///
    /// No ordering is guaranteed; the repository reindexer is correct for
    /// any enumeration order.
    fn all_preservation_documents(&self) -> IndexerResult<Vec<(String, BTreeSet<String>)>>;

    /// The direct parent ids of the given id, per the preservation layer
    fn preservation_parent_ids(&self, id: &str) -> IndexerResult<BTreeSet<String>>;

    /// Enumerate the index documents that list the given document as a
    /// direct parent
    fn child_index_documents(
        &self,
        document: &IndexDocument,
        extent: &Extent,
    ) -> IndexerResult<Vec<IndexDocument>>;

    /// Persist the given index document, replacing any prior record for
    /// that id
    fn write_index_document(&self, document: IndexDocument) -> IndexerResult<()>;
}

// ============================================================================
// Blanket Implementations
// ============================================================================

/// Blanket implementation of NestingAdapter for Arc<T>
impl<T: NestingAdapter + ?Sized> NestingAdapter for std::sync::Arc<T> {
    fn find_preservation_document(&self, id: &str) -> IndexerResult<PreservationDocument> {
        (**self).find_preservation_document(id)
    }

    fn find_index_document(&self, id: &str) -> IndexerResult<IndexDocument> {
        (**self).find_index_document(id)
    }

    fn all_preservation_documents(&self) -> IndexerResult<Vec<(String, BTreeSet<String>)>> {
        (**self).all_preservation_documents()
    }

    fn preservation_parent_ids(&self, id: &str) -> IndexerResult<BTreeSet<String>> {
        (**self).preservation_parent_ids(id)
    }

    fn child_index_documents(
        &self,
        document: &IndexDocument,
        extent: &Extent,
    ) -> IndexerResult<Vec<IndexDocument>> {
        (**self).child_index_documents(document, extent)
    }

    fn write_index_document(&self, document: IndexDocument) -> IndexerResult<()> {
        (**self).write_index_document(document)
    }
}
