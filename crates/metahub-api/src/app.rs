//! Application builder: wires router, middleware and state into an Axum app.

use std::sync::Arc;

use axum::Router;

use metahub_core::config::AppConfig;
use metahub_core::error::AppError;
use metahub_database::CatalogStore;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application over a catalog store.
pub fn build_app(config: AppConfig, store: Arc<dyn CatalogStore>) -> Router {
    build_router(AppState::new(config, store))
}

/// Runs the MetaHub server until Ctrl-C.
pub async fn run_server(config: AppConfig, store: Arc<dyn CatalogStore>) -> Result<(), AppError> {
    let addr = config.server.bind_address();
    tracing::info!(backend = store.backend(), "Starting MetaHub server...");

    let app = build_app(config, store);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("MetaHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("MetaHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
