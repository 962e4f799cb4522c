//! Placements and resolved edit targets

use content_tree::AnchorId;
use serde::{Deserialize, Serialize};

/// Where an edit lands relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    /// At the start of the document
    Prepend,
    /// At the end of the document
    Append,
    Before,
    After,
    Replace,
    Delete,
}

impl Placement {
    /// Whether this placement is relative to an anchor or range
    pub fn is_relative(&self) -> bool {
        !matches!(self, Placement::Prepend | Placement::Append)
    }
}

/// Relation of an edit to an addressed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Before,
    After,
    Replace,
    Delete,
}

impl From<Relation> for Placement {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Before => Placement::Before,
            Relation::After => Placement::After,
            Relation::Replace => Placement::Replace,
            Relation::Delete => Placement::Delete,
        }
    }
}

/// Absolute ends of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentEdge {
    Start,
    End,
}

/// What an edit is positioned against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// The document as a whole
    Document,
    /// An anchored element
    Anchor(AnchorId),
    /// A document range named by its heading text
    Range(String),
}

/// The outcome of resolving a logical address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub target: Target,
    pub placement: Placement,
}

impl ResolvedTarget {
    /// Target the whole document
    pub fn document(edge: DocumentEdge) -> Self {
        let placement = match edge {
            DocumentEdge::Start => Placement::Prepend,
            DocumentEdge::End => Placement::Append,
        };
        Self {
            target: Target::Document,
            placement,
        }
    }

    /// Target an anchored element
    pub fn anchor(anchor: AnchorId, relation: Relation) -> Self {
        Self {
            target: Target::Anchor(anchor),
            placement: relation.into(),
        }
    }

    /// The anchor, for anchor targets
    pub fn anchor_id(&self) -> Option<&AnchorId> {
        match &self.target {
            Target::Anchor(anchor) => Some(anchor),
            _ => None,
        }
    }
}
