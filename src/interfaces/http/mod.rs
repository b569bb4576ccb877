//! HTTP front end: routes, handlers and error mapping.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, MessageResponse};
pub use state::AppState;

use crate::config::ServerEnvConfig;
use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/retrain", post(handlers::retrain))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(config: &ServerEnvConfig, state: AppState) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = router(state, config.max_upload_bytes);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received. Exiting...");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}
