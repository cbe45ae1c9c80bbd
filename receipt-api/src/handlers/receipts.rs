//! Receipt Handlers

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use receipt_core::{ReceiptPatch, ReceiptStatus};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{ReceiptListResponse, ReceiptResponse},
    error::{ApiError, ApiResult},
    services::{ingest, UploadRequest, UploadedFile},
    state::AppState,
};

fn parse_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::invalid_input(format!("invalid receipt id '{}'", id)))
}

/// List receipts, newest first
pub async fn list_receipts(State(state): State<AppState>) -> ApiResult<Json<ReceiptListResponse>> {
    let receipts = state.repository.list().await?;
    Ok(Json(ReceiptListResponse { receipts }))
}

/// Create a receipt from a multipart upload
///
/// Fields: `file` or `fileUrl`, optional `vendorName`, `date`, `grandTotal`.
/// Unknown fields are ignored.
pub async fn create_receipt(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ReceiptResponse>)> {
    let request = read_upload(multipart).await?;
    let receipt = ingest(&state, request).await?;
    Ok((StatusCode::CREATED, Json(ReceiptResponse { receipt })))
}

async fn read_upload(mut multipart: Multipart) -> ApiResult<UploadRequest> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_input(format!("malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_input(format!("failed to read file: {}", e)))?;
                request.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "fileUrl" | "vendorName" | "date" | "grandTotal" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::invalid_input(format!("failed to read {}: {}", name, e)))?;
                match name.as_str() {
                    "fileUrl" => request.file_url = Some(text),
                    "vendorName" => request.hints.vendor_name = Some(text),
                    "date" => request.hints.date = Some(text),
                    _ => request.hints.grand_total = Some(text),
                }
            }
            _ => {}
        }
    }

    Ok(request)
}

/// Get a receipt by id
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReceiptResponse>> {
    let id = parse_id(&id)?;
    let receipt = state
        .repository
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("receipt {}", id)))?;
    Ok(Json(ReceiptResponse { receipt }))
}

/// Partially update a receipt
pub async fn update_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ReceiptResponse>> {
    let id = parse_id(&id)?;
    let Json(body) = body.map_err(|e| ApiError::invalid_input(e.body_text()))?;
    let patch = ReceiptPatch::from_json(body)?;
    let receipt = state.repository.update(id, &patch).await?;

    info!(receipt_id = %id, "Receipt updated");
    Ok(Json(ReceiptResponse { receipt }))
}

/// Mark a receipt approved
pub async fn approve_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReceiptResponse>> {
    transition(&state, &id, ReceiptStatus::Approved).await
}

/// Mark a receipt rejected
pub async fn reject_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReceiptResponse>> {
    transition(&state, &id, ReceiptStatus::Rejected).await
}

async fn transition(
    state: &AppState,
    id: &str,
    status: ReceiptStatus,
) -> ApiResult<Json<ReceiptResponse>> {
    let id = parse_id(id)?;
    let receipt = state.repository.set_status(id, status).await?;

    info!(receipt_id = %id, status = %status, "Receipt reviewed");
    Ok(Json(ReceiptResponse { receipt }))
}
