//! ReceiptFlow Blob Storage
//!
//! Persists raw uploaded receipt files and returns a locator for each one.
//!
//! # Backends
//!
//! - [`LocalBlobStore`]: a single upload directory, locators `/uploads/<name>`
//! - [`S3BlobStore`]: an S3 bucket, locators are object URLs
//!
//! Which backend runs is decided at startup: complete S3 credentials select
//! S3, anything else falls back to the local directory.
//!
//! Blob names are validated against `[A-Za-z0-9_.-]` before any filesystem
//! or network access, see [`validate_blob_name`].

pub mod backend;
pub mod error;
pub mod naming;

pub use backend::{
    BackendType, BlobStore, HealthStatus, LocalBlobStore, S3BlobStore, S3Config,
    LOCAL_LOCATOR_PREFIX,
};
pub use error::{StorageError, StorageResult};
pub use naming::validate_blob_name;
