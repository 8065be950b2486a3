//! Client error types

use shared::store::StoreError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server-side failure
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => StoreError::Network(e.to_string()),
            ClientError::InvalidResponse(msg) => StoreError::Decode(msg),
            ClientError::NotFound(msg) => StoreError::NotFound(msg),
            ClientError::Validation(msg) => StoreError::Status {
                status: 400,
                message: msg,
            },
            ClientError::Server { status, message } => StoreError::Status { status, message },
            ClientError::Serialization(e) => StoreError::Decode(e.to_string()),
        }
    }
}
