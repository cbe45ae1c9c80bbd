//! API Router
//!
//! Route definitions for the receipt API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{handlers, state::AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::liveness))
        .route("/health/ready", get(handlers::readiness))
        // Receipt endpoints
        .route(
            "/receipts",
            get(handlers::list_receipts).post(handlers::create_receipt),
        )
        .route(
            "/receipts/:id",
            get(handlers::get_receipt).patch(handlers::update_receipt),
        )
        .route("/receipts/:id/approve", post(handlers::approve_receipt))
        .route("/receipts/:id/reject", post(handlers::reject_receipt))
        // Export and file endpoints
        .route("/exports", get(handlers::export_receipts))
        .route("/uploads/:filename", get(handlers::serve_upload))
        // AI endpoints
        .route("/ai/analyze", post(handlers::analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
