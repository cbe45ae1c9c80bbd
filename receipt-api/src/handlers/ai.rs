//! AI Analysis Handler
//!
//! Runs header extraction on an image without creating a receipt. Unlike
//! ingestion, failures here are reported to the caller.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use receipt_core::{build_prompt, parse_model_output};

use crate::{
    dto::{AnalyzeRequest, AnalyzeResponse},
    error::{ApiError, ApiResult},
    services::{run_model, ImageAcquirer, ImageSource},
    state::AppState,
};

/// Analyze a base64 image or an image URL
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = body.map_err(|e| ApiError::invalid_input(e.body_text()))?;

    let inline = request
        .image_base64
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let url = request
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if inline.is_none() && url.is_none() {
        return Err(ApiError::invalid_input("imageBase64 or imageUrl is required"));
    }

    let extractor = state
        .vision
        .as_deref()
        .ok_or_else(|| ApiError::UpstreamUnavailable("AI extraction is not configured".into()))?;

    let acquirer = ImageAcquirer::from_state(&state);
    let image = match inline {
        Some(encoded) => {
            let (data_url_mime, payload) = split_data_url(encoded);
            let bytes = BASE64
                .decode(payload)
                .map_err(|e| ApiError::invalid_input(format!("invalid base64 image: {}", e)))?;
            let mime_type = request
                .mime_type
                .as_deref()
                .or(data_url_mime)
                .unwrap_or_default();
            acquirer
                .acquire(ImageSource::Bytes {
                    bytes: &bytes,
                    mime_type,
                })
                .await?
        }
        None => {
            acquirer
                .acquire(ImageSource::Locator(url.unwrap_or_default()))
                .await?
        }
    };

    let prompt = build_prompt(&request.header_hint);
    let raw = run_model(extractor, image, &prompt, state.config.ai_timeout).await?;
    let header_fields = parse_model_output(&raw).ok();

    Ok(Json(AnalyzeResponse { raw, header_fields }))
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and payload
fn split_data_url(value: &str) -> (Option<&str>, &str) {
    match value.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((meta, payload)) => {
            let mime = meta.split(';').next().filter(|m| !m.is_empty());
            (mime, payload)
        }
        None => (None, value),
    }
}
