//! Error types for address resolution

use thiserror::Error;

/// Why a logical address could not be resolved to an anchor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Anchor not found: {0}")]
    AnchorNotFound(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("No addressable item at position {position} of list {list}")]
    ListItemNotFound { list: String, position: String },

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("No row where {key} = {value}")]
    RowNotFound { key: String, value: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
