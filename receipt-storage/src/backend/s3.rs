//! S3 Blob Store
//!
//! Objects are written under the `receipts/` key prefix and addressed by
//! their virtual-hosted URL, which becomes the receipt's locator.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::{debug, info};

use super::traits::{BackendType, BlobStore, HealthStatus};
use crate::error::{StorageError, StorageResult};
use crate::naming::validate_blob_name;

/// Key prefix for every stored receipt blob
pub const KEY_PREFIX: &str = "receipts/";

/// S3 backend configuration
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Custom endpoint URL (MinIO, LocalStack)
    pub endpoint: Option<String>,
    /// AWS region
    pub region: String,
    /// Bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
}

impl S3Config {
    /// Public URL of an object key
    pub fn object_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key),
            None => format!("https://{}.s3.amazonaws.com/{}", self.bucket, key),
        }
    }

    /// Object key for a locator produced by this configuration
    pub fn key_for_locator<'a>(&self, locator: &'a str) -> Option<&'a str> {
        let prefix = self.object_url("");
        locator.strip_prefix(prefix.as_str())
    }
}

/// S3 blob store
pub struct S3BlobStore {
    client: S3Client,
    config: S3Config,
}

impl S3BlobStore {
    /// Build a client from explicit credentials
    pub async fn new(config: S3Config) -> StorageResult<Self> {
        if config.bucket.is_empty() {
            return Err(StorageError::Configuration("S3 bucket name is empty".into()));
        }

        let region_provider =
            RegionProviderChain::first_try(Region::new(config.region.clone()));
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "receiptflow",
        );

        let shared = aws_config::from_env()
            .region(region_provider)
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = S3Client::from_conf(builder.build());

        info!(
            bucket = %config.bucket,
            region = %config.region,
            "Initialized S3 blob store"
        );

        Ok(Self { client, config })
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, name: &str, data: &[u8], content_type: &str) -> StorageResult<String> {
        validate_blob_name(name)?;
        let key = format!("{}{}", KEY_PREFIX, name);

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Unavailable(format!("S3 upload failed: {}", e)))?;

        debug!(key = %key, size = data.len(), "Stored blob in S3");

        Ok(self.config.object_url(&key))
    }

    async fn read(&self, locator: &str) -> StorageResult<Vec<u8>> {
        let key = self
            .config
            .key_for_locator(locator)
            .ok_or_else(|| StorageError::NotFound(locator.to_string()))?;

        let output = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::ReadFailed(format!("S3 download failed: {}", service_error))
                }
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::ReadFailed(format!("S3 body read failed: {}", e)))?;

        Ok(body.into_bytes().to_vec())
    }

    fn backend_type(&self) -> BackendType {
        BackendType::S3
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        match self
            .client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
        {
            Ok(_) => Ok(HealthStatus::healthy()),
            Err(e) => Ok(HealthStatus::unhealthy(&format!("HeadBucket failed: {}", e))),
        }
    }
}
