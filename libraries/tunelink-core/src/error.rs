/// Core error types for TuneLink
use thiserror::Error;

/// Result type alias using `LinkError`
pub type Result<T> = std::result::Result<T, LinkError>;

/// Core error type for TuneLink
#[derive(Error, Debug)]
pub enum LinkError {
    /// URL does not match any known platform or content pattern
    #[error("Unsupported link format: {0}")]
    UnsupportedFormat(String),

    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// Persistent storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LinkError {
    /// Create an unsupported format error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
