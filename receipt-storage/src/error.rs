//! Blob Storage Error Types

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Blob not found
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// Write operation failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Read operation failed
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// Backend unreachable or misconfigured
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Blob name outside the allowed character set
    #[error("Invalid blob name: {0}")]
    InvalidName(String),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;
