//! Snapshot-backed tree cache
//!
//! The raw markup snapshot is the single source of truth. The tree is derived
//! from it on first access and thrown away whenever the snapshot changes.

use crate::{ContentTree, Result, TreeError};
use std::cell::OnceCell;

/// Owns a markup snapshot and the tree lazily derived from it
#[derive(Debug, Default)]
pub struct ContentCache {
    snapshot: Option<String>,
    tree: OnceCell<Result<ContentTree>>,
}

impl ContentCache {
    /// Create a cache for the given snapshot (which may be absent)
    pub fn new(snapshot: Option<String>) -> Self {
        Self {
            snapshot,
            tree: OnceCell::new(),
        }
    }

    /// The raw markup, if any
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Replace the snapshot and drop the derived tree
    pub fn replace(&mut self, snapshot: Option<String>) {
        self.snapshot = snapshot;
        self.invalidate();
    }

    /// Drop the derived tree so the next access re-parses the snapshot
    pub fn invalidate(&mut self) {
        self.tree = OnceCell::new();
    }

    /// Whether a tree is currently materialized (successfully or not)
    pub fn is_built(&self) -> bool {
        self.tree.get().is_some()
    }

    /// Get the tree, parsing the snapshot on first access
    pub fn tree(&self) -> Result<&ContentTree> {
        self.tree
            .get_or_init(|| {
                let parsed = match self.snapshot.as_deref() {
                    Some(markup) => ContentTree::parse(markup),
                    None => Err(TreeError::Empty),
                };
                if let Err(e) = &parsed {
                    tracing::warn!("Content tree unavailable, document treated as corrupted: {}", e);
                }
                parsed
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether the snapshot fails to produce a tree
    pub fn is_corrupted(&self) -> bool {
        self.tree().is_err()
    }
}
