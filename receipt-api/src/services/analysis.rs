//! AI Header Analysis
//!
//! Gets the receipt image into memory, sends it to the vision extractor with
//! the extraction prompt, and parses the reply. Ingestion uses
//! [`extract_header`], which turns every failure into `None`; the
//! `/ai/analyze` endpoint uses the fallible pieces directly.

use std::time::Duration;

use receipt_core::{build_prompt, parse_model_output, HeaderFields, ReceiptHints};
use receipt_storage::{BlobStore, StorageError};
use receipt_vision::{VisionExtractor, VisionImage};
use tracing::{debug, warn};

use super::media::{content_type_for_name, OCTET_STREAM};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Fallback MIME type for images whose type cannot be determined
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Where the receipt image comes from
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// Bytes already in memory (fresh upload or inline base64)
    Bytes { bytes: &'a [u8], mime_type: &'a str },
    /// Blob store locator or remote `http(s)` URL
    Locator(&'a str),
}

/// Successful AI contribution
#[derive(Debug, Clone)]
pub struct AiExtraction {
    /// Model text as returned
    pub raw: String,
    /// Parsed header fields
    pub fields: HeaderFields,
}

/// Loads receipt images for the vision model
pub struct ImageAcquirer<'a> {
    blob_store: &'a dyn BlobStore,
    http: &'a reqwest::Client,
    max_bytes: usize,
}

impl<'a> ImageAcquirer<'a> {
    pub fn new(blob_store: &'a dyn BlobStore, http: &'a reqwest::Client, max_bytes: usize) -> Self {
        Self {
            blob_store,
            http,
            max_bytes,
        }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(
            state.blob_store.as_ref(),
            &state.http,
            state.config.max_upload_bytes,
        )
    }

    /// Resolve `source` to image bytes
    ///
    /// Locators are read from the blob store first; only when the store does
    /// not know them and they are `http(s)` URLs are they fetched remotely.
    pub async fn acquire(&self, source: ImageSource<'_>) -> ApiResult<VisionImage> {
        match source {
            ImageSource::Bytes { bytes, mime_type } => {
                Ok(VisionImage::new(image_mime(Some(mime_type), None), bytes.to_vec()))
            }
            ImageSource::Locator(locator) => match self.blob_store.read(locator).await {
                Ok(bytes) => Ok(VisionImage::new(image_mime(None, Some(locator)), bytes)),
                Err(StorageError::NotFound(_)) if is_remote(locator) => self.fetch(locator).await,
                Err(e) => Err(ApiError::UpstreamUnavailable(format!(
                    "receipt image unavailable: {}",
                    e
                ))),
            },
        }
    }

    async fn fetch(&self, url: &str) -> ApiResult<VisionImage> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ApiError::UpstreamUnavailable(format!("image fetch failed: {}", e)))?;

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(ApiError::invalid_input(format!(
                    "remote image is {} bytes, limit is {}",
                    length, self.max_bytes
                )));
            }
        }

        let declared = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

        // Bodies without a length are capped while streaming
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ApiError::UpstreamUnavailable(format!("image fetch failed: {}", e)))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(ApiError::invalid_input(format!(
                    "remote image exceeds {} bytes",
                    self.max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(url = %url, size = bytes.len(), "Fetched remote receipt image");
        Ok(VisionImage::new(
            image_mime(declared.as_deref(), Some(url)),
            bytes,
        ))
    }
}

fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

fn image_mime(declared: Option<&str>, name: Option<&str>) -> String {
    declared
        .filter(|ct| !ct.is_empty() && *ct != OCTET_STREAM)
        .or_else(|| name.and_then(content_type_for_name))
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string()
}

/// Call the extractor, bounded by `timeout`
pub async fn run_model(
    extractor: &dyn VisionExtractor,
    image: VisionImage,
    prompt: &str,
    timeout: Duration,
) -> ApiResult<String> {
    match tokio::time::timeout(timeout, extractor.extract(image, prompt)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ApiError::UpstreamUnavailable(format!(
            "{} did not answer within {:?}",
            extractor.model_name(),
            timeout
        ))),
    }
}

/// Best-effort AI layer for the reconciliation pipeline
///
/// Returns `None` when AI is not configured, the image cannot be loaded, the
/// call fails or times out, or the reply is not a JSON object.
pub async fn extract_header(
    state: &AppState,
    source: ImageSource<'_>,
    hints: &ReceiptHints,
) -> Option<AiExtraction> {
    let Some(extractor) = state.vision.as_deref() else {
        debug!("AI extraction not configured, using hints only");
        return None;
    };

    let image = match ImageAcquirer::from_state(state).acquire(source).await {
        Ok(image) => image,
        Err(e) => {
            warn!(error = %e, "Skipping AI extraction, image not available");
            return None;
        }
    };

    let prompt = build_prompt(hints);
    let raw = match run_model(extractor, image, &prompt, state.config.ai_timeout).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "AI extraction failed, falling back to hints");
            return None;
        }
    };

    match parse_model_output(&raw) {
        Ok(fields) => {
            debug!(model = extractor.model_name(), "AI extraction succeeded");
            Some(AiExtraction { raw, fields })
        }
        Err(e) => {
            warn!(error = %e, "AI reply unusable, falling back to hints");
            None
        }
    }
}
