//! Indexer Configuration
//!
//! The engine's configuration surface is deliberately small: one depth knob.
//! It bounds both the breadth-first traversal of a single-id reindex and the
//! parent pre-walk of a whole-repository rebuild, so the two independent
//! budgets cannot drift apart unless a caller sets them apart deliberately
//! through the `_with_depth` entry points.

use serde::{Deserialize, Serialize};

use crate::error::{IndexerError, IndexerResult};

/// Default number of nesting levels a traversal may spend before it is
/// treated as a probable cycle
pub const DEFAULT_MAXIMUM_NESTING_DEPTH: usize = 15;

/// Configuration for a [`NestingIndexer`]
///
/// [`NestingIndexer`]: crate::NestingIndexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Maximum nesting depth for traversals; short-circuits overly deep
    /// nesting and keeps accidental cyclic graphs from looping forever
    pub maximum_nesting_depth: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            maximum_nesting_depth: DEFAULT_MAXIMUM_NESTING_DEPTH,
        }
    }
}

impl IndexerConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: set the maximum nesting depth
    #[must_use]
    pub fn with_maximum_nesting_depth(mut self, maximum_nesting_depth: usize) -> Self {
        self.maximum_nesting_depth = maximum_nesting_depth;
        self
    }

    /// Check the configuration, failing fast rather than mid-traversal
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::Configuration`] when `maximum_nesting_depth`
    /// is zero, since a zero budget would fail every reindex at its first
    /// node.
    pub fn validate(&self) -> IndexerResult<()> {
        if self.maximum_nesting_depth == 0 {
            return Err(IndexerError::configuration(
                "maximum_nesting_depth must be at least 1",
            ));
        }
        Ok(())
    }
}
