//! Export Handler

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use receipt_export::{render, ExportFormat};

use crate::{
    dto::ExportQuery,
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Download every receipt as csv, xlsx, pdf or json (default csv)
pub async fn export_receipts(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let format: ExportFormat = match query.format.as_deref() {
        Some(value) if !value.trim().is_empty() => value.parse()?,
        _ => ExportFormat::default(),
    };

    let receipts = state.repository.list().await?;

    // Spreadsheet and PDF rendering are CPU-bound
    let document = tokio::task::spawn_blocking(move || render(&receipts, format))
        .await
        .map_err(|e| ApiError::Internal(format!("export task failed: {}", e)))??;

    let disposition = format!("attachment; filename={}", document.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
