//! Indexer Error Types
//!
//! Error handling for nesting index operations. Every failure aborts the
//! current operation (single-id reindex or whole-repository rebuild) and
//! surfaces to the caller with the offending document id; nothing is
//! swallowed or retried internally.

use std::collections::BTreeSet;

use thiserror::Error;

/// Error type for nesting index operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexerError {
    /// The preservation layer has no document with the given id
    #[error("preservation document not found: {id}")]
    PreservationDocumentNotFound { id: String },

    /// The index layer has no document with the given id
    #[error("index document not found: {id}")]
    IndexDocumentNotFound { id: String },

    /// The repository-wide parent pre-walk ran out of its time-to-live
    /// budget, which signals a cycle in the stored parent relationships
    #[error("possible graph cycle discovered related to id {id}")]
    CycleDetected { id: String },

    /// The breadth-first traversal ran out of allotted levels, which signals
    /// a probable cycle or a pathologically deep graph under the starting id
    #[error("exceeded maximum nesting depth while indexing id {id}")]
    ExceededMaximumNestingDepth { id: String },

    /// A freshly computed set of pathnames would make the document its own
    /// ancestor. Raised before any write; the prior index state is intact.
    #[error("document {id} is marked as its own ancestor based on the pathnames: {pathnames:?}")]
    DocumentIsItsOwnAncestor {
        id: String,
        pathnames: BTreeSet<String>,
    },

    /// Configuration error caught at construction time
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A per-id failure during a whole-repository run, wrapped with the
    /// offending id and the original cause
    #[error("error while reindexing id {id}: {source}")]
    Reindexing {
        id: String,
        #[source]
        source: Box<IndexerError>,
    },

    /// Storage backend error surfaced by a real adapter implementation
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for nesting index operations
pub type IndexerResult<T> = Result<T, IndexerError>;

impl IndexerError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a generic backend error
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }

    /// Wrap an error that escaped the reindexing of a single id
    pub fn reindexing(id: impl Into<String>, source: IndexerError) -> Self {
        Self::Reindexing {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// The document id this error relates to, when there is one
    pub fn document_id(&self) -> Option<&str> {
        match self {
            Self::PreservationDocumentNotFound { id }
            | Self::IndexDocumentNotFound { id }
            | Self::CycleDetected { id }
            | Self::ExceededMaximumNestingDepth { id }
            | Self::DocumentIsItsOwnAncestor { id, .. }
            | Self::Reindexing { id, .. } => Some(id),
            Self::Configuration(_) | Self::Backend(_) => None,
        }
    }
}
