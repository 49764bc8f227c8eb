//! Nesting Indexer Facade
//!
//! [`NestingIndexer`] owns an adapter and a configuration and exposes the
//! two public operations: reindexing one id with its descendants, and
//! rebuilding the entire repository. All traversal mechanics live in the
//! engine modules behind it.

use crate::adapter::{Extent, NestingAdapter};
use crate::config::IndexerConfig;
use crate::error::IndexerResult;
use crate::reindex::{RelationshipReindexer, RepositoryReindexer};

/// Public entry point for nesting index maintenance
///
/// # Example
///
/// ```
/// use trellis_core::{
///     Extent, IndexerConfig, InMemoryAdapter, NestingAdapter, NestingIndexer,
///     PreservationDocument,
/// };
///
/// let adapter = InMemoryAdapter::new();
/// adapter.write_preservation_document(PreservationDocument::new("a", Vec::<String>::new()));
/// adapter.write_preservation_document(PreservationDocument::new("b", ["a"]));
///
/// let indexer = NestingIndexer::new(adapter, IndexerConfig::new()).unwrap();
/// indexer.reindex_all(&Extent::full()).unwrap();
///
/// let b = indexer.adapter().find_index_document("b").unwrap();
/// assert!(b.pathnames.contains("a/b"));
/// ```
pub struct NestingIndexer<A> {
    adapter: A,
    config: IndexerConfig,
}

impl<A: NestingAdapter> NestingIndexer<A> {
    /// Create an indexer over the given adapter
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid; misconfiguration surfaces
    /// here, never mid-traversal.
    pub fn new(adapter: A, config: IndexerConfig) -> IndexerResult<Self> {
        config.validate()?;
        Ok(Self { adapter, config })
    }

    /// The injected adapter
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The active configuration
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Reindex the document for `id` and all of its descendants
    ///
    /// The caller is responsible for `id`'s ancestors already being
    /// correctly indexed. Uses the configured maximum nesting depth.
    pub fn reindex_relationships(&self, id: &str, extent: &Extent) -> IndexerResult<()> {
        self.reindex_relationships_with_depth(id, self.config.maximum_nesting_depth, extent)
    }

    /// Reindex `id` and its descendants with an explicit depth budget
    pub fn reindex_relationships_with_depth(
        &self,
        id: &str,
        maximum_nesting_depth: usize,
        extent: &Extent,
    ) -> IndexerResult<()> {
        RelationshipReindexer::call(&self.adapter, id, maximum_nesting_depth, extent)
    }

    /// Rebuild the index record of every document in the preservation layer
    ///
    /// Correct for any enumeration order; parents are forced to be
    /// processed before children. Uses the configured maximum nesting depth
    /// for both the parent pre-walk and each per-id traversal.
    pub fn reindex_all(&self, extent: &Extent) -> IndexerResult<()> {
        self.reindex_all_with_depth(self.config.maximum_nesting_depth, extent)
    }

    /// Rebuild the whole repository with an explicit depth budget
    pub fn reindex_all_with_depth(
        &self,
        maximum_nesting_depth: usize,
        extent: &Extent,
    ) -> IndexerResult<()> {
        RepositoryReindexer::call(&self.adapter, maximum_nesting_depth, extent)
    }
}
