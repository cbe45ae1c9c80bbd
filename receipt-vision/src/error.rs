//! Vision Client Error Types

use thiserror::Error;

/// Vision extraction errors
#[derive(Debug, Error)]
pub enum VisionError {
    /// Model endpoint unreachable, rejected the call, or not configured
    #[error("Vision model unavailable: {0}")]
    Unavailable(String),

    /// Model replied without usable text
    #[error("Malformed vision response: {0}")]
    MalformedResponse(String),
}

/// Vision result type
pub type VisionResult<T> = Result<T, VisionError>;
