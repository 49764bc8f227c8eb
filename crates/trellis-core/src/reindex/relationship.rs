//! Relationship Reindexer
//!
//! Breadth-first engine that recomputes and persists the index record for a
//! starting id and every descendant reachable through the index layer's
//! child-of relation. Each dequeued node is processed only after all of its
//! ancestors relevant to this invocation have been written; that ordering is
//! the load-bearing correctness property, not an optimization.

use std::collections::VecDeque;

use tracing::debug;

use crate::adapter::{Extent, NestingAdapter};
use crate::builder::NestingAttributes;
use crate::documents::{IndexDocument, PATHNAME_DELIMITER};
use crate::error::{IndexerError, IndexerResult};

/// An index document waiting in the traversal queue, paired with how many
/// breadth-first levels it has left
struct ProcessingDocument {
    document: IndexDocument,
    remaining_depth: usize,
}

/// Breadth-first reindexer for one id and its descendants
pub(crate) struct RelationshipReindexer<'a, A: NestingAdapter + ?Sized> {
    adapter: &'a A,
    id: String,
    maximum_nesting_depth: usize,
    extent: &'a Extent,
    queue: VecDeque<ProcessingDocument>,
}

impl<'a, A: NestingAdapter + ?Sized> RelationshipReindexer<'a, A> {
    /// Reindex `id` and its descendants, spending at most
    /// `maximum_nesting_depth` breadth-first levels
    ///
    /// The caller is responsible for the starting id's ancestors already
    /// being indexed; descendants are handled here.
    pub(crate) fn call(
        adapter: &'a A,
        id: &str,
        maximum_nesting_depth: usize,
        extent: &'a Extent,
    ) -> IndexerResult<()> {
        Self {
            adapter,
            id: id.to_string(),
            maximum_nesting_depth,
            extent,
            queue: VecDeque::new(),
        }
        .run()
    }

    fn run(mut self) -> IndexerResult<()> {
        debug!(id = %self.id, "starting relationship reindex");

        let initial = self.initial_index_document()?;
        self.enqueue(initial, self.maximum_nesting_depth);
        while let Some(entry) = self.queue.pop_front() {
            self.process_a_document(entry)?;
        }

        debug!(id = %self.id, "finished relationship reindex");
        Ok(())
    }

    /// The current index record for the starting id
    ///
    /// A starting id that is present in preservation but has never been
    /// indexed seeds the traversal with a blank record; only its id feeds
    /// the recomputation. Without this, a whole-repository rebuild could not
    /// bootstrap an empty index layer.
    fn initial_index_document(&self) -> IndexerResult<IndexDocument> {
        match self.adapter.find_index_document(&self.id) {
            Ok(document) => Ok(document),
            Err(IndexerError::IndexDocumentNotFound { .. }) => {
                Ok(IndexDocument::new(self.id.clone()))
            }
            Err(error) => Err(error),
        }
    }

    fn enqueue(&mut self, document: IndexDocument, remaining_depth: usize) {
        self.queue.push_back(ProcessingDocument {
            document,
            remaining_depth,
        });
    }

    fn process_a_document(&mut self, entry: ProcessingDocument) -> IndexerResult<()> {
        if entry.remaining_depth == 0 {
            return Err(IndexerError::ExceededMaximumNestingDepth {
                id: self.id.clone(),
            });
        }
        debug!(
            id = %entry.document.id,
            remaining_depth = entry.remaining_depth,
            "indexing document"
        );

        let preservation = self
            .adapter
            .find_preservation_document(&entry.document.id)?;
        let attributes = NestingAttributes::compile(&preservation, self.adapter)?;
        guard_against_self_ancestry(&preservation.id, &attributes)?;

        let document = attributes.into_index_document(preservation.id);
        self.adapter.write_index_document(document.clone())?;

        for child in self.adapter.child_index_documents(&document, self.extent)? {
            self.enqueue(child, entry.remaining_depth - 1);
        }
        Ok(())
    }
}

/// Fail before writing when the candidate pathnames list the document as a
/// non-terminal segment of its own route, which would make it its own
/// ancestor
fn guard_against_self_ancestry(id: &str, attributes: &NestingAttributes) -> IndexerResult<()> {
    for pathname in &attributes.pathnames {
        let segments: Vec<&str> = pathname.split(PATHNAME_DELIMITER).collect();
        if segments[..segments.len() - 1].contains(&id) {
            return Err(IndexerError::DocumentIsItsOwnAncestor {
                id: id.to_string(),
                pathnames: attributes.pathnames.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryAdapter;
    use crate::documents::PreservationDocument;

    fn seed_chain(adapter: &InMemoryAdapter) {
        // a -> b -> c -> d, preservation and index both populated.
        adapter.write_preservation_document(PreservationDocument::new("a", Vec::<String>::new()));
        adapter.write_preservation_document(PreservationDocument::new("b", ["a"]));
        adapter.write_preservation_document(PreservationDocument::new("c", ["b"]));
        adapter.write_preservation_document(PreservationDocument::new("d", ["c"]));
        adapter
            .write_index_document(IndexDocument::new("a").with_pathnames(["a"]))
            .expect("write");
        adapter
            .write_index_document(
                IndexDocument::new("b")
                    .with_parent_ids(["a"])
                    .with_pathnames(["a/b"])
                    .with_ancestors(["a"]),
            )
            .expect("write");
        adapter
            .write_index_document(
                IndexDocument::new("c")
                    .with_parent_ids(["b"])
                    .with_pathnames(["a/b/c"])
                    .with_ancestors(["a", "a/b"]),
            )
            .expect("write");
        adapter
            .write_index_document(
                IndexDocument::new("d")
                    .with_parent_ids(["c"])
                    .with_pathnames(["a/b/c/d"])
                    .with_ancestors(["a", "a/b", "a/b/c"]),
            )
            .expect("write");
    }

    #[test]
    fn test_depth_budget_too_small_fails() {
        let adapter = InMemoryAdapter::new();
        seed_chain(&adapter);

        let result = RelationshipReindexer::call(&adapter, "a", 2, &Extent::full());
        assert_eq!(
            result,
            Err(IndexerError::ExceededMaximumNestingDepth {
                id: "a".to_string()
            })
        );
    }

    #[test]
    fn test_depth_budget_covering_the_chain_succeeds() {
        let adapter = InMemoryAdapter::new();
        seed_chain(&adapter);

        RelationshipReindexer::call(&adapter, "a", 5, &Extent::full()).expect("reindex");

        let d = adapter.find_index_document("d").expect("find");
        assert_eq!(
            d,
            IndexDocument::new("d")
                .with_parent_ids(["c"])
                .with_pathnames(["a/b/c/d"])
                .with_ancestors(["a", "a/b", "a/b/c"])
        );
    }

    #[test]
    fn test_descendants_pick_up_a_parent_membership_change() {
        let adapter = InMemoryAdapter::new();
        seed_chain(&adapter);
        // b leaves a and becomes a root.
        adapter.write_preservation_document(PreservationDocument::new("b", Vec::<String>::new()));

        RelationshipReindexer::call(&adapter, "b", 5, &Extent::full()).expect("reindex");

        let b = adapter.find_index_document("b").expect("find");
        assert_eq!(b, IndexDocument::new("b").with_pathnames(["b"]));
        let d = adapter.find_index_document("d").expect("find");
        assert_eq!(
            d,
            IndexDocument::new("d")
                .with_parent_ids(["c"])
                .with_pathnames(["b/c/d"])
                .with_ancestors(["b", "b/c"])
        );
    }

    #[test]
    fn test_self_ancestry_is_rejected_before_any_write() {
        let adapter = InMemoryAdapter::new();
        adapter.write_preservation_document(PreservationDocument::new("a", Vec::<String>::new()));
        adapter.write_preservation_document(PreservationDocument::new("b", ["a"]));
        adapter
            .write_index_document(IndexDocument::new("a").with_pathnames(["a"]))
            .expect("write");
        adapter
            .write_index_document(
                IndexDocument::new("b")
                    .with_parent_ids(["a"])
                    .with_pathnames(["a/b"])
                    .with_ancestors(["a"]),
            )
            .expect("write");
        let before = adapter.all_index_documents();

        // Introduce the cycle: a now claims b as its parent.
        adapter.write_preservation_document(PreservationDocument::new("a", ["b"]));
        let result = RelationshipReindexer::call(&adapter, "a", 10, &Extent::full());

        match result {
            Err(IndexerError::DocumentIsItsOwnAncestor { id, pathnames }) => {
                assert_eq!(id, "a");
                assert!(pathnames.contains("a/b/a"));
            }
            other => panic!("expected DocumentIsItsOwnAncestor, got {other:?}"),
        }
        // The index layer is exactly as it was before the attempt.
        assert_eq!(adapter.all_index_documents(), before);
    }

    #[test]
    fn test_never_indexed_starting_id_is_seeded_blank() {
        let adapter = InMemoryAdapter::new();
        adapter.write_preservation_document(PreservationDocument::new("a", Vec::<String>::new()));

        RelationshipReindexer::call(&adapter, "a", 5, &Extent::full()).expect("reindex");

        let a = adapter.find_index_document("a").expect("find");
        assert_eq!(a, IndexDocument::new("a").with_pathnames(["a"]));
    }

    #[test]
    fn test_unknown_id_surfaces_preservation_not_found() {
        let adapter = InMemoryAdapter::new();

        let result = RelationshipReindexer::call(&adapter, "ghost", 5, &Extent::full());
        assert_eq!(
            result,
            Err(IndexerError::PreservationDocumentNotFound {
                id: "ghost".to_string()
            })
        );
    }
}
