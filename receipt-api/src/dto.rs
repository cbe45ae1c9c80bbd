//! Request and response bodies

use chrono::{DateTime, Utc};
use receipt_core::{HeaderFields, Receipt, ReceiptHints};
use serde::{Deserialize, Serialize};

/// Single receipt envelope
#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub receipt: Receipt,
}

/// Receipt list envelope, newest first
#[derive(Debug, Serialize)]
pub struct ReceiptListResponse {
    pub receipts: Vec<Receipt>,
}

/// `GET /exports` query
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// `POST /ai/analyze` body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Base64 image, optionally as a `data:` URL
    pub image_base64: Option<String>,
    /// Remote image URL or `/uploads/...` locator
    pub image_url: Option<String>,
    /// MIME type of `image_base64`
    pub mime_type: Option<String>,
    #[serde(default)]
    pub header_hint: ReceiptHints,
}

/// `POST /ai/analyze` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Model text as returned
    pub raw: String,
    /// Parsed fields, `null` when the text is not a JSON object
    pub header_fields: Option<HeaderFields>,
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage_backend: String,
    pub storage_healthy: bool,
    pub database_backend: String,
    pub database_healthy: bool,
    pub ai_configured: bool,
    pub timestamp: DateTime<Utc>,
}
