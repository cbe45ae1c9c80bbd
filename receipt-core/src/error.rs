//! Core Error Types

use thiserror::Error;

/// Errors raised by the receipt domain
#[derive(Debug, Error)]
pub enum CoreError {
    /// Request data failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Vision model returned text that is not a JSON object
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),
}

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
