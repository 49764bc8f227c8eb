//! Repository Reindexer
//!
//! Drives a full-graph rebuild. For every document in the preservation
//! layer, the declared parent chain is walked to the top first, so parents
//! are always indexed before children; only then does the relationship
//! reindexer run for the id itself. This makes the rebuild correct for any
//! enumeration order the preservation layer happens to produce.
//!
//! The pre-walk carries its own time-to-live budget, independent of the
//! breadth-first depth budget: the declared parent graph is raw stored input
//! and may already be cyclic, and walking it to completion needs its own
//! termination bound.

use std::collections::HashSet;

use tracing::debug;

use crate::adapter::{Extent, NestingAdapter};
use crate::error::{IndexerError, IndexerResult};
use crate::reindex::RelationshipReindexer;

/// Whole-repository rebuild driver
pub(crate) struct RepositoryReindexer<'a, A: NestingAdapter + ?Sized> {
    adapter: &'a A,
    maximum_nesting_depth: usize,
    extent: &'a Extent,
    processed_ids: HashSet<String>,
}

impl<'a, A: NestingAdapter + ?Sized> RepositoryReindexer<'a, A> {
    /// Rebuild the index record of every document in the preservation layer
    ///
    /// `maximum_nesting_depth` bounds both the parent pre-walk and each
    /// per-id breadth-first traversal.
    pub(crate) fn call(
        adapter: &'a A,
        maximum_nesting_depth: usize,
        extent: &'a Extent,
    ) -> IndexerResult<()> {
        let mut reindexer = Self {
            adapter,
            maximum_nesting_depth,
            extent,
            processed_ids: HashSet::new(),
        };

        let documents = adapter.all_preservation_documents()?;
        debug!(documents = documents.len(), "starting repository reindex");
        for (id, parent_ids) in documents {
            let parent_ids: Vec<String> = parent_ids.into_iter().collect();
            reindexer.recursive_seed(&id, &parent_ids, maximum_nesting_depth)?;
        }
        debug!("finished repository reindex");
        Ok(())
    }

    /// Reindex `id`, forcing its declared parents to be reindexed first
    ///
    /// `time_to_live` decreases by one per parent hop; running out means the
    /// stored parent relationships themselves form a cycle.
    fn recursive_seed(
        &mut self,
        id: &str,
        parent_ids: &[String],
        time_to_live: usize,
    ) -> IndexerResult<()> {
        if self.processed_ids.contains(id) {
            return Ok(());
        }
        if time_to_live == 0 {
            return Err(IndexerError::CycleDetected { id: id.to_string() });
        }
        for parent_id in parent_ids {
            let grandparent_ids = self
                .adapter
                .preservation_parent_ids(parent_id)?
                .into_iter()
                .collect::<Vec<_>>();
            self.recursive_seed(parent_id, &grandparent_ids, time_to_live - 1)?;
        }
        self.reindex_an_id(id)
    }

    fn reindex_an_id(&mut self, id: &str) -> IndexerResult<()> {
        RelationshipReindexer::call(self.adapter, id, self.maximum_nesting_depth, self.extent)
            .map_err(|source| IndexerError::reindexing(id, source))?;
        self.processed_ids.insert(id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryAdapter;
    use crate::documents::{IndexDocument, PreservationDocument};

    #[test]
    fn test_diamond_rebuild_from_preservation_only() {
        let adapter = InMemoryAdapter::new();
        adapter.write_preservation_document(PreservationDocument::new("a", Vec::<String>::new()));
        adapter.write_preservation_document(PreservationDocument::new("b", ["a"]));
        adapter.write_preservation_document(PreservationDocument::new("c", ["a", "b"]));
        adapter.write_preservation_document(PreservationDocument::new("d", ["c", "e"]));
        adapter.write_preservation_document(PreservationDocument::new("e", ["b"]));

        RepositoryReindexer::call(&adapter, 15, &Extent::full()).expect("reindex all");

        let c = adapter.find_index_document("c").expect("find");
        assert_eq!(
            c,
            IndexDocument::new("c")
                .with_parent_ids(["a", "b"])
                .with_pathnames(["a/c", "a/b/c"])
                .with_ancestors(["a", "a/b"])
        );
        let d = adapter.find_index_document("d").expect("find");
        assert_eq!(
            d.pathnames,
            ["a/c/d", "a/b/c/d", "a/b/e/d"]
                .into_iter()
                .map(String::from)
                .collect()
        );
    }

    #[test]
    fn test_declared_cycle_is_detected_in_the_pre_walk() {
        let adapter = InMemoryAdapter::new();
        adapter.write_preservation_document(PreservationDocument::new("a", ["b"]));
        adapter.write_preservation_document(PreservationDocument::new("b", ["a"]));

        let result = RepositoryReindexer::call(&adapter, 15, &Extent::full());
        match result {
            Err(IndexerError::CycleDetected { .. }) => {}
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    /// Delegates to an in-memory store but refuses index writes for one id,
    /// standing in for a backend fault mid-rebuild.
    struct FailingWrites {
        inner: InMemoryAdapter,
        fail_id: String,
    }

    impl NestingAdapter for FailingWrites {
        fn find_preservation_document(
            &self,
            id: &str,
        ) -> crate::IndexerResult<PreservationDocument> {
            self.inner.find_preservation_document(id)
        }

        fn find_index_document(&self, id: &str) -> crate::IndexerResult<IndexDocument> {
            self.inner.find_index_document(id)
        }

        fn all_preservation_documents(
            &self,
        ) -> crate::IndexerResult<Vec<(String, std::collections::BTreeSet<String>)>> {
            self.inner.all_preservation_documents()
        }

        fn preservation_parent_ids(
            &self,
            id: &str,
        ) -> crate::IndexerResult<std::collections::BTreeSet<String>> {
            self.inner.preservation_parent_ids(id)
        }

        fn child_index_documents(
            &self,
            document: &IndexDocument,
            extent: &Extent,
        ) -> crate::IndexerResult<Vec<IndexDocument>> {
            self.inner.child_index_documents(document, extent)
        }

        fn write_index_document(&self, document: IndexDocument) -> crate::IndexerResult<()> {
            if document.id == self.fail_id {
                return Err(IndexerError::backend("write rejected"));
            }
            self.inner.write_index_document(document)
        }
    }

    #[test]
    fn test_per_id_failure_is_wrapped_with_the_offending_id() {
        let adapter = FailingWrites {
            inner: InMemoryAdapter::new(),
            fail_id: "b".to_string(),
        };
        adapter
            .inner
            .write_preservation_document(PreservationDocument::new("a", Vec::<String>::new()));
        adapter
            .inner
            .write_preservation_document(PreservationDocument::new("b", ["a"]));

        let result = RepositoryReindexer::call(&adapter, 15, &Extent::full());
        match result {
            Err(IndexerError::Reindexing { id, source }) => {
                assert_eq!(id, "b");
                assert_eq!(*source, IndexerError::backend("write rejected"));
            }
            other => panic!("expected Reindexing, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_declared_parent_surfaces_unwrapped() {
        let adapter = InMemoryAdapter::new();
        adapter.write_preservation_document(PreservationDocument::new("b", ["ghost"]));

        let result = RepositoryReindexer::call(&adapter, 15, &Extent::full());
        assert_eq!(
            result,
            Err(IndexerError::PreservationDocumentNotFound {
                id: "ghost".to_string()
            })
        );
    }
}
