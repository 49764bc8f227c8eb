//! Document Model
//!
//! Immutable value types shared by the preservation layer and the index
//! layer. The preservation layer is the authoritative store of direct parent
//! relationships; the index layer is the derived, denormalized store of
//! pathnames, ancestors, and parent ids that the reindexing engine writes.
//!
//! All relationship fields are `BTreeSet`s, so equality is defined over
//! normalized (sorted, de-duplicated) values regardless of the order a
//! backend returned them in.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Delimiter joining document ids into pathnames and ancestor prefixes
pub const PATHNAME_DELIMITER: &str = "/";

// ============================================================================
// PreservationDocument
// ============================================================================

/// A document as the preservation layer sees it: an id plus its direct
/// parent ids
///
/// This does not include grandparents, great-grandparents, etc. The record
/// is created and updated by the hosting application whenever a document's
/// membership changes; the engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreservationDocument {
    /// The document's permanent identifier
    pub id: String,

    /// Direct parents only
    #[serde(default)]
    pub parent_ids: BTreeSet<String>,
}

impl PreservationDocument {
    /// Create a preservation document from an id and its direct parent ids
    pub fn new<I, S>(id: impl Into<String>, parent_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            parent_ids: parent_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the document has no parents
    pub fn is_orphan(&self) -> bool {
        self.parent_ids.is_empty()
    }
}

// ============================================================================
// IndexDocument
// ============================================================================

/// A document as the index layer sees it
///
/// Every field other than `id` is fully recomputed (never incrementally
/// patched) each time the engine reindexes the id. That full replacement is
/// the invariant that makes reindexing idempotent.
///
/// # Pathnames and ancestors
///
/// A pathname is one `/`-delimited root-to-node route through the graph. If
/// `a` has child `b`, and `b` has children `c` and `e`, then `c` is
/// addressable as `a/b/c`. A node with multiple parents has one pathname per
/// route. Ancestors are every strict prefix of every pathname, unioned with
/// each parent's own ancestor set, and answer "is X nested under Y" without
/// graph traversal at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// The document's permanent identifier
    pub id: String,

    /// Direct parents only
    #[serde(default)]
    pub parent_ids: BTreeSet<String>,

    /// Every root-to-node route, `/`-delimited
    #[serde(default)]
    pub pathnames: BTreeSet<String>,

    /// Every strict prefix of every pathname, plus the parents' ancestors
    #[serde(default)]
    pub ancestors: BTreeSet<String>,
}

impl IndexDocument {
    /// Create a blank index document for the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder-style: set the parent ids
    #[must_use]
    pub fn with_parent_ids<I, S>(mut self, parent_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_ids = parent_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style: set the pathnames
    #[must_use]
    pub fn with_pathnames<I, S>(mut self, pathnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pathnames = pathnames.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style: set the ancestors
    #[must_use]
    pub fn with_ancestors<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    /// True when this document lists the given id as a direct parent
    pub fn is_child_of(&self, id: &str) -> bool {
        self.parent_ids.contains(id)
    }

    /// The largest nesting depth of this document, counted in pathname
    /// segments
    ///
    /// If `a` contains `b` contains `c`, then `c` has a deepest nested depth
    /// of 3. Returns 0 for a document with no pathnames.
    pub fn deepest_nested_depth(&self) -> usize {
        self.pathnames
            .iter()
            .map(|pathname| pathname.split(PATHNAME_DELIMITER).count())
            .max()
            .unwrap_or(0)
    }
}
