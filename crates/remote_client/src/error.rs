//! Error types for remote calls

use thiserror::Error;

/// Failure below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport failure: {0}")]
    Io(String),
}

/// Errors surfaced by `RemoteClient`
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service rejected the request with a readable description
    #[error("{code}: {message}")]
    Remote { code: u16, message: String },

    /// The service rejected the request without a readable description
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Every attempt timed out
    #[error("Request timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response parsed but lacked a required field
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { code, .. } => Some(*code),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for remote calls
pub type Result<T> = std::result::Result<T, ClientError>;
