use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Which event backend is configured.
    pub source: &'static str,
    /// Whether the event backend is reachable.
    pub source_healthy: bool,
}

/// GET /health -- returns service and event source health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let source_healthy = match state.source.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(source = state.source.name(), error = %e, "Event source unhealthy");
            false
        }
    };

    let status = if source_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        source: state.source.name(),
        source_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
