//! API Server setup

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::router::create_router;
use crate::state::AppState;

/// Wrap a router in the tracing and CORS layers
pub fn with_middleware(router: Router, enable_cors: bool) -> Router {
    let router = router.layer(TraceLayer::new_for_http());

    if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Create the API server
pub async fn create_server(
    config: AppConfig,
) -> Result<(Router, SocketAddr), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = config.bind_addr().parse()?;
    let enable_cors = config.enable_cors;

    let state = AppState::from_config(config).await?;
    let router = with_middleware(create_router(state), enable_cors);

    Ok((router, addr))
}

/// Run the API server until the process is stopped
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config).await?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Receipt API listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Receipt API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
