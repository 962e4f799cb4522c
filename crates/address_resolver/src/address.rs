//! Logical addresses and their resolution

use crate::{
    find_row, find_table, header_texts, list_item_anchors, resolve_column, row_cell_anchors,
    DocumentEdge, ListPosition, Relation, ResolveError, ResolvedTarget, Result, Target,
};
use content_tree::{AnchorId, ContentTree};
use serde::{Deserialize, Serialize};

/// A caller-facing description of where an edit should land
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalAddress {
    /// Start or end of the whole document
    Document(DocumentEdge),
    /// An element identified directly by its anchor
    Anchor { anchor: AnchorId, relation: Relation },
    /// An item of the list carrying `list` as its anchor
    ListItem {
        list: AnchorId,
        position: ListPosition,
        relation: Relation,
    },
    /// The cell in `column` of the row where `search_key` equals `search_value`
    Cell {
        sheet: Option<String>,
        search_key: String,
        search_value: String,
        column: String,
    },
    /// A document range introduced by a heading with the given text
    Range { heading: String, relation: Relation },
}

impl LogicalAddress {
    pub fn start() -> Self {
        LogicalAddress::Document(DocumentEdge::Start)
    }

    pub fn end() -> Self {
        LogicalAddress::Document(DocumentEdge::End)
    }

    pub fn anchor(anchor: impl Into<AnchorId>, relation: Relation) -> Self {
        LogicalAddress::Anchor {
            anchor: anchor.into(),
            relation,
        }
    }

    pub fn list_item(list: impl Into<AnchorId>, position: ListPosition, relation: Relation) -> Self {
        LogicalAddress::ListItem {
            list: list.into(),
            position,
            relation,
        }
    }

    pub fn cell(
        sheet: Option<&str>,
        search_key: impl Into<String>,
        search_value: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        LogicalAddress::Cell {
            sheet: sheet.map(str::to_string),
            search_key: search_key.into(),
            search_value: search_value.into(),
            column: column.into(),
        }
    }

    pub fn range(heading: impl Into<String>, relation: Relation) -> Self {
        LogicalAddress::Range {
            heading: heading.into(),
            relation,
        }
    }
}

/// Resolve an address against the current tree, `None` when it cannot be
/// addressed
pub fn resolve(tree: &ContentTree, address: &LogicalAddress) -> Option<ResolvedTarget> {
    resolve_strict(tree, address).ok()
}

/// Resolve an address, reporting why it could not be addressed.
///
/// Anchor addresses must name an element present in the tree. Range
/// addresses are passed through; the service matches the heading text.
pub fn resolve_strict(tree: &ContentTree, address: &LogicalAddress) -> Result<ResolvedTarget> {
    let resolved = match address {
        LogicalAddress::Document(edge) => ResolvedTarget::document(*edge),

        LogicalAddress::Anchor { anchor, relation } => {
            if tree.find_by_anchor(anchor.as_str()).is_none() {
                return Err(ResolveError::AnchorNotFound(anchor.to_string()));
            }
            ResolvedTarget::anchor(anchor.clone(), *relation)
        }

        LogicalAddress::ListItem {
            list,
            position,
            relation,
        } => {
            if tree.find_by_anchor(list.as_str()).is_none() {
                return Err(ResolveError::ListNotFound(list.to_string()));
            }
            let items = list_item_anchors(tree, list.as_str());
            let anchor = position
                .index(items.len())
                .and_then(|i| items.into_iter().nth(i).flatten())
                .ok_or_else(|| ResolveError::ListItemNotFound {
                    list: list.to_string(),
                    position: position.to_string(),
                })?;
            ResolvedTarget::anchor(anchor, *relation)
        }

        LogicalAddress::Cell {
            sheet,
            search_key,
            search_value,
            column,
        } => {
            let table = find_table(tree, sheet.as_deref()).ok_or_else(|| {
                ResolveError::SheetNotFound(sheet.clone().unwrap_or_default())
            })?;
            let row = find_row(tree, table, search_key, search_value).ok_or_else(|| {
                ResolveError::RowNotFound {
                    key: search_key.clone(),
                    value: search_value.clone(),
                }
            })?;
            let headers = header_texts(tree, table);
            let anchor = resolve_column(&headers, column, Some(0))
                .filter(|&index| index != 0)
                .and_then(|index| row_cell_anchors(tree, row).into_iter().nth(index).flatten())
                .ok_or_else(|| ResolveError::ColumnNotFound(column.clone()))?;
            ResolvedTarget::anchor(anchor, Relation::Replace)
        }

        LogicalAddress::Range { heading, relation } => ResolvedTarget {
            target: Target::Range(heading.clone()),
            placement: (*relation).into(),
        },
    };

    tracing::debug!("Resolved {:?} to {:?}", address, resolved);
    Ok(resolved)
}
