//! Receipt Ingestion
//!
//! The receipt-creation use case: validate the upload, store the blob, run
//! the reconciliation pipeline and persist a `DRAFT` receipt.

use receipt_core::{reconcile, Receipt, ReceiptHints};
use tracing::{info, warn};

use super::analysis::{extract_header, ImageSource};
use super::media::{new_blob_name, resolve_content_type};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// File part of an upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Receipt creation request
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<UploadedFile>,
    pub file_url: Option<String>,
    pub hints: ReceiptHints,
}

impl UploadRequest {
    /// Non-empty uploaded file, if any
    fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref().filter(|f| !f.bytes.is_empty())
    }

    /// Trimmed non-blank URL, if any
    fn file_url(&self) -> Option<&str> {
        self.file_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Require at least one image source
    pub fn validate(&self) -> ApiResult<()> {
        if self.file().is_none() && self.file_url().is_none() {
            return Err(ApiError::invalid_input(
                "either a file or a fileUrl is required",
            ));
        }
        Ok(())
    }
}

/// Create a receipt from an upload
///
/// Storage and repository failures abort the request. The AI layer never
/// does: without it the receipt is built from the hints alone.
pub async fn ingest(state: &AppState, request: UploadRequest) -> ApiResult<Receipt> {
    request.validate()?;

    let (locator, stored_blob, content_type) = match request.file() {
        Some(file) => {
            let name = new_blob_name(file.file_name.as_deref());
            let content_type =
                resolve_content_type(file.content_type.as_deref(), file.file_name.as_deref());
            let locator = state
                .blob_store
                .put(&name, &file.bytes, &content_type)
                .await?;
            (locator, true, content_type)
        }
        None => {
            let url = request.file_url().unwrap_or_default().to_string();
            (url, false, String::new())
        }
    };

    let source = match request.file() {
        Some(file) => ImageSource::Bytes {
            bytes: &file.bytes,
            mime_type: &content_type,
        },
        None => ImageSource::Locator(&locator),
    };

    let ai = extract_header(state, source, &request.hints).await;
    let reconciled = reconcile(&request.hints, ai.map(|extraction| extraction.fields));
    let ai_applied = reconciled.ai_applied;

    let receipt = Receipt::draft(locator, reconciled);

    let created = match state.repository.create(&receipt).await {
        Ok(created) => created,
        Err(e) => {
            if stored_blob {
                warn!(
                    file_locator = %receipt.file_locator,
                    error = %e,
                    "Receipt insert failed, stored blob is orphaned"
                );
            }
            return Err(e.into());
        }
    };

    info!(
        receipt_id = %created.id,
        file_locator = %created.file_locator,
        ai_applied,
        "Receipt created"
    );

    Ok(created)
}
