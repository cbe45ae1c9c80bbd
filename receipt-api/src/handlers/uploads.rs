//! Uploaded File Handler

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use receipt_storage::validate_blob_name;

use crate::{
    error::ApiResult,
    services::media::{content_type_for_name, OCTET_STREAM},
    state::AppState,
};

const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Serve a locally stored upload
///
/// The name is validated before the filesystem is touched.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    validate_blob_name(&filename)?;

    let bytes = state.uploads.read_name(&filename).await?;
    let content_type = content_type_for_name(&filename).unwrap_or(OCTET_STREAM);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        bytes,
    )
        .into_response())
}
