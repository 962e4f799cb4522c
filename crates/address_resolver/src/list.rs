//! List-position resolution

use content_tree::{AnchorId, ContentTree, NodeIndex};
use serde::{Deserialize, Serialize};

/// Position of an item within a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListPosition {
    First,
    Last,
    /// Direct index; negative values count from the end (-1 is the last item)
    Nth(isize),
}

impl ListPosition {
    /// Concrete index into a sequence of `len` items
    pub fn index(&self, len: usize) -> Option<usize> {
        match self {
            ListPosition::First => signed_index(0, len),
            ListPosition::Last => signed_index(-1, len),
            ListPosition::Nth(index) => signed_index(*index, len),
        }
    }
}

impl std::fmt::Display for ListPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListPosition::First => write!(f, "first"),
            ListPosition::Last => write!(f, "last"),
            ListPosition::Nth(index) => write!(f, "{}", index),
        }
    }
}

/// Map a possibly negative index onto `0..len`
pub fn signed_index(index: isize, len: usize) -> Option<usize> {
    if index >= 0 {
        let index = index as usize;
        (index < len).then_some(index)
    } else {
        len.checked_sub(index.unsigned_abs())
    }
}

/// The `li` elements at or below `list`, in document order
pub fn list_items(tree: &ContentTree, list: NodeIndex) -> Vec<NodeIndex> {
    tree.descendants_by_tag(list, "li")
}

/// Anchors of the items of the list carrying `list_anchor`
pub fn list_item_anchors(tree: &ContentTree, list_anchor: &str) -> Vec<Option<AnchorId>> {
    let Some(list) = tree.find_by_anchor(list_anchor) else {
        return Vec::new();
    };
    list_items(tree, list)
        .into_iter()
        .map(|item| tree.anchor(item).cloned())
        .collect()
}

/// Anchor of the item at `position` in the list carrying `list_anchor`.
///
/// Returns `None` when the list is missing, the position is out of range, or
/// the item has no anchor. Callers must treat `None` as "cannot address".
pub fn resolve_list_item(
    tree: &ContentTree,
    list_anchor: &str,
    position: ListPosition,
) -> Option<AnchorId> {
    let items = list_item_anchors(tree, list_anchor);
    let index = position.index(items.len())?;
    let anchor = items.into_iter().nth(index).flatten();
    tracing::debug!(
        "Resolved {} item of list {} to {:?}",
        position,
        list_anchor,
        anchor
    );
    anchor
}
