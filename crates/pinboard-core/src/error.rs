//! Error types for pinboard-core

use thiserror::Error;

/// Result type alias using pinboard-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pinboard-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Notes API returned an error payload or an unexpected response
    #[error("API error: {0}")]
    Api(String),

    /// Auth gate error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Object storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
