//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use receipt_core::CoreError;
use receipt_db::DbError;
use receipt_export::ExportError;
use receipt_storage::StorageError;
use receipt_vision::VisionError;
use serde::Serialize;
use thiserror::Error;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing upload source, malformed body or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// AI backend unreachable, failing or not configured
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// AI backend replied with something unusable
    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    /// Blob store error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository error
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Export rendering error
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: String,
    /// Error message
    pub message: String,
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            CoreError::MalformedModelOutput(msg) => Self::MalformedUpstreamResponse(msg),
        }
    }
}

impl From<VisionError> for ApiError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Unavailable(msg) => Self::UpstreamUnavailable(msg),
            VisionError::MalformedResponse(msg) => Self::MalformedUpstreamResponse(msg),
        }
    }
}

impl ApiError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP status and stable error code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::UpstreamUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_UNAVAILABLE")
            }
            ApiError::MalformedUpstreamResponse(_) => {
                (StatusCode::BAD_GATEWAY, "MALFORMED_UPSTREAM_RESPONSE")
            }
            ApiError::Storage(StorageError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Storage(StorageError::InvalidName(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT")
            }
            ApiError::Storage(StorageError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE")
            }
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApiError::Database(DbError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Database(DbError::InvalidUpdate(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT")
            }
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ApiError::Export(ExportError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT")
            }
            ApiError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        } else {
            tracing::debug!(code, error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
