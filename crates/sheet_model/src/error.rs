//! Error types for sheet operations

use thiserror::Error;

/// Errors that can occur while reading or exporting sheets
#[derive(Debug, Error)]
pub enum SheetError {
    /// No table matches the requested sheet
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// A literal cell reference that is not `Column:row`
    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    /// A header-keyed value addressed a column past the row limit
    #[error("Column out of range: {0}")]
    ColumnOutOfRange(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing an XLSX workbook
    #[error("XLSX write error: {0}")]
    Xlsx(String),
}

/// Result type for sheet operations
pub type Result<T> = std::result::Result<T, SheetError>;
