//! Local Filesystem Blob Store
//!
//! Writes uploads into a single directory and hands out `/uploads/<name>`
//! locators, which the HTTP layer serves back from the same directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::traits::{BackendType, BlobStore, HealthStatus};
use crate::error::{StorageError, StorageResult};
use crate::naming::validate_blob_name;

/// Locator prefix for locally stored blobs
pub const LOCAL_LOCATOR_PREFIX: &str = "/uploads/";

/// Local filesystem blob store
pub struct LocalBlobStore {
    /// Upload directory
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store, creating the directory if needed
    pub async fn new(base_path: impl AsRef<Path>) -> StorageResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Configuration(format!(
                "Failed to create upload directory {:?}: {}",
                base_path, e
            ))
        })?;

        info!("Initialized local blob store at {:?}", base_path);

        Ok(Self { base_path })
    }

    /// Upload directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a validated blob name to its file path
    pub fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        validate_blob_name(name)?;
        Ok(self.base_path.join(name))
    }

    /// Read a blob by bare file name
    pub async fn read_name(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(StorageError::ReadFailed(format!("{}: {}", name, e))),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, name: &str, data: &[u8], content_type: &str) -> StorageResult<String> {
        let path = self.path_for(name)?;

        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", name, e)))?;

        debug!(
            name = %name,
            size = data.len(),
            content_type = %content_type,
            "Stored blob locally"
        );

        Ok(format!("{}{}", LOCAL_LOCATOR_PREFIX, name))
    }

    async fn read(&self, locator: &str) -> StorageResult<Vec<u8>> {
        let name = locator
            .strip_prefix(LOCAL_LOCATOR_PREFIX)
            .ok_or_else(|| StorageError::NotFound(locator.to_string()))?;
        self.read_name(name).await
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Local
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        if !self.base_path.exists() {
            return Ok(HealthStatus::unhealthy("Upload directory does not exist"));
        }

        let test_path = self.base_path.join(".health_check");
        match fs::write(&test_path, b"health_check").await {
            Ok(_) => {
                let _ = fs::remove_file(&test_path).await;
                Ok(HealthStatus::healthy())
            }
            Err(e) => Ok(HealthStatus::unhealthy(&format!("Write test failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (LocalBlobStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path().join("uploads"))
            .await
            .unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_read() {
        let (store, _temp_dir) = create_test_store().await;

        let locator = store.put("abc.jpg", b"jpeg bytes", "image/jpeg").await.unwrap();
        assert_eq!(locator, "/uploads/abc.jpg");

        let data = store.read(&locator).await.unwrap();
        assert_eq!(data, b"jpeg bytes");

        let data = store.read_name("abc.jpg").await.unwrap();
        assert_eq!(data, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_missing_blob() {
        let (store, _temp_dir) = create_test_store().await;

        let err = store.read("/uploads/nope.png").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));

        let err = store
            .read("https://bucket.s3.amazonaws.com/receipts/x.png")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejects_unsafe_names() {
        let (store, _temp_dir) = create_test_store().await;

        let err = store.put("../escape.png", b"x", "image/png").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidName(_)));

        let err = store.read_name("../secret").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidName(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (store, _temp_dir) = create_test_store().await;

        let status = store.health_check().await.unwrap();
        assert!(status.healthy);
        assert_eq!(store.backend_type(), BackendType::Local);
    }
}
