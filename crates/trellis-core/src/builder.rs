//! Path/Ancestor Builder
//!
//! Computes the nesting data for one document from its direct parents'
//! already-written index records. The builder is pure over its inputs and
//! the adapter reads it performs: it writes nothing and carries no state
//! across invocations.

use std::collections::BTreeSet;

use crate::adapter::NestingAdapter;
use crate::documents::{IndexDocument, PreservationDocument, PATHNAME_DELIMITER};
use crate::error::IndexerResult;

/// The nesting data computed for one document: merged parent ids, pathnames,
/// and ancestors
///
/// A fixed-shape value constructed once per invocation. Callers that need
/// the result in two places clone it; nothing is mutated after compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingAttributes {
    /// Direct parents contributing to this document's nesting
    pub parent_ids: BTreeSet<String>,

    /// Every root-to-node route through the graph
    pub pathnames: BTreeSet<String>,

    /// Every strict prefix of every pathname, plus the parents' ancestors
    pub ancestors: BTreeSet<String>,
}

impl NestingAttributes {
    /// Compile the nesting data for `document` from its parents' index
    /// records
    ///
    /// The caller is responsible for ordering: every parent must already
    /// hold a correct index record when this runs. For each parent, each of
    /// the parent's pathnames is extended with `document.id` to form a new
    /// pathname; every strict prefix of that new pathname becomes an
    /// ancestor; and the parent's own ancestor set is unioned in so that
    /// ancestors computed in prior passes are never lost. A document with no
    /// parents is addressable by its own id.
    ///
    /// # Errors
    ///
    /// Fails when a parent has no index record.
    pub fn compile<A: NestingAdapter + ?Sized>(
        document: &PreservationDocument,
        adapter: &A,
    ) -> IndexerResult<Self> {
        let mut attributes = Self {
            parent_ids: BTreeSet::new(),
            pathnames: BTreeSet::new(),
            ancestors: BTreeSet::new(),
        };

        for parent_id in &document.parent_ids {
            let parent = adapter.find_index_document(parent_id)?;
            attributes.merge_parent(&document.id, &parent);
        }

        // Ensuring that an orphan has a path to get to it
        if attributes.parent_ids.is_empty() {
            attributes.pathnames.insert(document.id.clone());
        }

        Ok(attributes)
    }

    /// Convert into the index document that will be written for `id`
    pub fn into_index_document(self, id: impl Into<String>) -> IndexDocument {
        IndexDocument {
            id: id.into(),
            parent_ids: self.parent_ids,
            pathnames: self.pathnames,
            ancestors: self.ancestors,
        }
    }

    fn merge_parent(&mut self, id: &str, parent: &IndexDocument) {
        self.parent_ids.insert(parent.id.clone());
        for pathname in &parent.pathnames {
            self.pathnames
                .insert(format!("{pathname}{PATHNAME_DELIMITER}{id}"));

            // Every prefix of the parent's pathname is a strict prefix of
            // the new pathname.
            let mut prefix = String::with_capacity(pathname.len());
            for segment in pathname.split(PATHNAME_DELIMITER) {
                if !prefix.is_empty() {
                    prefix.push_str(PATHNAME_DELIMITER);
                }
                prefix.push_str(segment);
                self.ancestors.insert(prefix.clone());
            }
        }
        self.ancestors
            .extend(parent.ancestors.iter().cloned());
    }
}
