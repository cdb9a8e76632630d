//! Error types for tolino-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Tolino operations
pub type Result<T> = std::result::Result<T, TolinoError>;

/// Tolino error types
#[derive(Error, Debug)]
pub enum TolinoError {
    #[error("Encryption key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Invalid key file {path:?}: expected 32 bytes, got {len}")]
    InvalidKey { path: PathBuf, len: usize },

    #[error("Random number generator failed: {0}")]
    Entropy(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Malformed credential record: {0}")]
    MalformedRecord(#[source] serde_json::Error),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Storage error at {path:?}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tolino integration is disabled")]
    Disabled,

    #[error("Book file not found: {0:?}")]
    BookNotFound(PathBuf),

    #[error("No Tolino credentials available")]
    MissingCredentials,

    #[error("Upload failed: {0}")]
    Upload(String),
}

impl TolinoError {
    /// Wrap an I/O error with the path it occurred on
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means no usable key could be obtained
    pub fn is_key_unavailable(&self) -> bool {
        matches!(
            self,
            Self::KeyUnavailable(_) | Self::InvalidKey { .. } | Self::Entropy(_)
        )
    }
}
