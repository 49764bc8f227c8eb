//! In-Memory Reference Adapter
//!
//! A reference implementation of [`NestingAdapter`] backed by two in-process
//! maps, one per layer. It stands in for a real search/storage backend in
//! tests and demos: construction and teardown are explicit, there is no
//! process-wide state, and every instance is fully isolated.
//!
//! The store uses interior mutability so a single instance can be shared
//! behind an `Arc` by test harnesses; the engine itself never reindexes
//! overlapping subgraphs concurrently.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

use crate::adapter::{Extent, NestingAdapter};
use crate::documents::{IndexDocument, PreservationDocument};
use crate::error::{IndexerError, IndexerResult};

/// In-memory store holding a preservation layer and an index layer
#[derive(Debug, Default)]
pub struct InMemoryAdapter {
    preservation: RwLock<HashMap<String, PreservationDocument>>,
    index: RwLock<HashMap<String, IndexDocument>>,
}

impl InMemoryAdapter {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a document to the preservation layer, replacing any prior
    /// record for that id
    ///
    /// This is how tests and demos mutate membership; a production system
    /// writes its preservation layer through its own channels and only
    /// exposes reads to the engine.
    pub fn write_preservation_document(&self, document: PreservationDocument) {
        self.preservation
            .write()
            .insert(document.id.clone(), document);
    }

    /// Snapshot every index document, sorted by id
    ///
    /// A test convenience for asserting over the whole index layer.
    pub fn all_index_documents(&self) -> Vec<IndexDocument> {
        let mut documents: Vec<IndexDocument> = self.index.read().values().cloned().collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        documents
    }

    /// Number of documents in the preservation layer
    pub fn preservation_len(&self) -> usize {
        self.preservation.read().len()
    }

    /// Number of documents in the index layer
    pub fn index_len(&self) -> usize {
        self.index.read().len()
    }

    /// Drop all documents from both layers
    pub fn clear(&self) {
        self.preservation.write().clear();
        self.index.write().clear();
    }
}

impl NestingAdapter for InMemoryAdapter {
    fn find_preservation_document(&self, id: &str) -> IndexerResult<PreservationDocument> {
        self.preservation.read().get(id).cloned().ok_or_else(|| {
            IndexerError::PreservationDocumentNotFound { id: id.to_string() }
        })
    }

    fn find_index_document(&self, id: &str) -> IndexerResult<IndexDocument> {
        self.index
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| IndexerError::IndexDocumentNotFound { id: id.to_string() })
    }

    fn all_preservation_documents(&self) -> IndexerResult<Vec<(String, BTreeSet<String>)>> {
        Ok(self
            .preservation
            .read()
            .values()
            .map(|document| (document.id.clone(), document.parent_ids.clone()))
            .collect())
    }

    fn preservation_parent_ids(&self, id: &str) -> IndexerResult<BTreeSet<String>> {
        Ok(self.find_preservation_document(id)?.parent_ids)
    }

    fn child_index_documents(
        &self,
        document: &IndexDocument,
        _extent: &Extent,
    ) -> IndexerResult<Vec<IndexDocument>> {
        // The reference store treats every enumeration as full extent.
        Ok(self
            .index
            .read()
            .values()
            .filter(|candidate| candidate.is_child_of(&document.id))
            .cloned()
            .collect())
    }

    fn write_index_document(&self, document: IndexDocument) -> IndexerResult<()> {
        self.index.write().insert(document.id.clone(), document);
        Ok(())
    }
}
