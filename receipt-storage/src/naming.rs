//! Blob name validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{StorageError, StorageResult};

static SAFE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid blob name regex"));

/// Check that `name` is a single safe path segment
///
/// Only `[A-Za-z0-9_.-]` is allowed, which already excludes path separators.
/// Names made only of dots (`.`, `..`) are refused as well.
pub fn validate_blob_name(name: &str) -> StorageResult<()> {
    if !SAFE_NAME.is_match(name) || name.chars().all(|c| c == '.') {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}
