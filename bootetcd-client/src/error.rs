//! Error types for the etcd client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to etcd
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    BuildFailed(String),
}

impl ClientError {
    /// Check if no connection could be established (nothing listening yet)
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.is_connect())
    }
}
