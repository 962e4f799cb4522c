//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// The service rejected or never answered a request
    #[error("Remote error: {0}")]
    Client(#[from] remote_client::ClientError),

    /// The thread's markup could not be parsed; identity fields stay usable
    #[error("Thread content is corrupted: {0}")]
    Corrupted(#[from] content_tree::TreeError),

    #[error("Sheet error: {0}")]
    Sheet(#[from] sheet_model::SheetError),

    /// A logical address names nothing in the current content
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// A placement needs an argument the caller did not supply
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// The placement cannot be used with the given target
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    /// The thread kind does not support the operation
    #[error("Unsupported thread type: {0}")]
    UnsupportedThread(String),
}

impl From<address_resolver::ResolveError> for EditError {
    fn from(err: address_resolver::ResolveError) -> Self {
        EditError::AddressNotFound(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
