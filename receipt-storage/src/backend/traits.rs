//! Blob Store Traits
//!
//! Backends are replaceable: the ingestion path only sees [`BlobStore`] and
//! the locator string it returns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageResult;

/// Blob Store Trait
///
/// A locator is whatever the backend returns from [`BlobStore::put`]: a
/// `/uploads/<name>` path for local storage or an object URL for S3. The
/// same locator is stored on the receipt and later handed back to
/// [`BlobStore::read`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist raw bytes under `name` and return the locator
    async fn put(&self, name: &str, data: &[u8], content_type: &str) -> StorageResult<String>;

    /// Read bytes back by locator
    ///
    /// Locators this backend did not produce yield `StorageError::NotFound`.
    async fn read(&self, locator: &str) -> StorageResult<Vec<u8>>;

    /// Get backend type identifier
    fn backend_type(&self) -> BackendType;

    /// Health check
    async fn health_check(&self) -> StorageResult<HealthStatus>;
}

/// Backend type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendType {
    /// Local filesystem
    Local,
    /// S3 object storage
    S3,
}

impl BackendType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backend health status
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Is healthy
    pub healthy: bool,
    /// Status message
    pub message: String,
    /// Check timestamp
    pub checked_at: DateTime<Utc>,
}

impl HealthStatus {
    /// Create healthy status
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            message: "OK".to_string(),
            checked_at: Utc::now(),
        }
    }

    /// Create unhealthy status
    pub fn unhealthy(message: &str) -> Self {
        Self {
            healthy: false,
            message: message.to_string(),
            checked_at: Utc::now(),
        }
    }
}
