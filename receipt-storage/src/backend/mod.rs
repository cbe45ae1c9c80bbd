//! Blob Store Backends

pub mod local;
pub mod s3;
pub mod traits;

pub use local::{LocalBlobStore, LOCAL_LOCATOR_PREFIX};
pub use s3::{S3BlobStore, S3Config};
pub use traits::{BackendType, BlobStore, HealthStatus};
