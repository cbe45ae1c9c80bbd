//! Health Handlers

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::warn;

use crate::{
    dto::HealthResponse,
    error::{ApiError, ApiResult},
    state::AppState,
};

async fn storage_healthy(state: &AppState) -> bool {
    match state.blob_store.health_check().await {
        Ok(status) => status.healthy,
        Err(e) => {
            warn!(error = %e, "Blob store health check failed");
            false
        }
    }
}

async fn database_healthy(state: &AppState) -> bool {
    match state.repository.health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Repository health check failed");
            false
        }
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage_healthy = storage_healthy(&state).await;
    let database_healthy = database_healthy(&state).await;

    Json(HealthResponse {
        status: if storage_healthy && database_healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: crate::VERSION.to_string(),
        storage_backend: state.blob_store.backend_type().to_string(),
        storage_healthy,
        database_backend: state.repository.backend_name().to_string(),
        database_healthy,
        ai_configured: state.vision.is_some(),
        timestamp: Utc::now(),
    })
}

/// Liveness probe (for Kubernetes)
pub async fn liveness() -> &'static str {
    "OK"
}

/// Readiness probe (for Kubernetes)
pub async fn readiness(State(state): State<AppState>) -> ApiResult<&'static str> {
    if storage_healthy(&state).await && database_healthy(&state).await {
        Ok("OK")
    } else {
        Err(ApiError::UpstreamUnavailable(
            "storage or database not ready".to_string(),
        ))
    }
}
