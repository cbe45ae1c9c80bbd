//! Receipt REST API Layer
//!
//! HTTP API for uploading receipts, reviewing their extracted headers and
//! exporting them.
//!
//! # Endpoints
//!
//! ## Health
//! - `GET /health` - Health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! ## Receipts
//! - `GET /receipts` - List receipts, newest first
//! - `POST /receipts` - Upload a receipt (multipart `file` or `fileUrl`)
//! - `GET /receipts/:id` - Get a receipt
//! - `PATCH /receipts/:id` - Correct header fields
//! - `POST /receipts/:id/approve` - Approve
//! - `POST /receipts/:id/reject` - Reject
//!
//! ## Exports and files
//! - `GET /exports?format=csv|xlsx|pdf|json` - Download all receipts
//! - `GET /uploads/:filename` - Serve a locally stored upload
//!
//! ## AI
//! - `POST /ai/analyze` - Extract header fields from an image
//!
//! # Usage
//!
//! ```ignore
//! use receipt_api::{run_server, AppConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = AppConfig::from_env()?;
//!     run_server(config).await
//! }
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod services;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use router::create_router;
pub use server::{create_server, run_server, with_middleware};
pub use state::AppState;

/// API version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
