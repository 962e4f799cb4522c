//! Error types for content tree parsing

use thiserror::Error;

/// Why a snapshot could not be turned into a tree.
///
/// A `TreeError` is a degraded state rather than a fatal one: the owning
/// thread keeps its identity fields and only tree-dependent operations fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Document has no content")]
    Empty,

    #[error("Malformed markup at byte {position}: {message}")]
    Malformed { position: u64, message: String },
}

pub type Result<T> = std::result::Result<T, TreeError>;
