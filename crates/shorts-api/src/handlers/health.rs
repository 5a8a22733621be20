//! Health check handler.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub worker_running: bool,
    pub database: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
///
/// Reports overall liveness, the runner's running flag and store
/// connectivity.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.store.health_check().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        worker_running: state.runner.is_running(),
        database,
        timestamp: Utc::now().to_rfc3339(),
    })
}
