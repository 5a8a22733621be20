//! Credential configuration handlers.
//!
//! Secrets go in, service names come out; a stored value is never
//! returned through the API.

use std::collections::{BTreeMap, HashSet};

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use shorts_store::ConfiguredService;

use crate::error::ApiResult;
use crate::state::AppState;

/// Services that are useful but not required by the default provider
/// selection.
const OPTIONAL_SERVICES: &[&str] = &[
    "elevenlabs",
    "runway",
    "youtube_client_id",
    "youtube_client_secret",
    "youtube_refresh_token",
];

/// Configuration status response.
#[derive(Serialize)]
pub struct ConfigStatusResponse {
    /// Services that have a credential on file (names only)
    pub configured_services: Vec<ConfiguredService>,
    /// Credentials the selected providers need
    pub required_services: Vec<&'static str>,
    /// Whether every required credential is present
    pub required_configured: bool,
    /// Credentials for alternative providers and publishing
    pub optional_services: Vec<&'static str>,
}

/// GET /api/config/status
pub async fn config_status(
    State(state): State<AppState>,
) -> ApiResult<Json<ConfigStatusResponse>> {
    let configured = state.store.configured_services().await?;
    let configured_names: HashSet<&str> =
        configured.iter().map(|s| s.service.as_str()).collect();

    let required_services = state.settings.required_services();
    let required_configured = required_services
        .iter()
        .all(|s| configured_names.contains(s));

    Ok(Json(ConfigStatusResponse {
        configured_services: configured,
        required_services,
        required_configured,
        optional_services: OPTIONAL_SERVICES.to_vec(),
    }))
}

/// Save response.
#[derive(Serialize)]
pub struct SaveConfigResponse {
    pub saved: Vec<String>,
    pub message: String,
}

/// POST /api/config/save
///
/// Accepts a map of service name to secret value. Blank values are
/// ignored so an empty form field never wipes a stored credential.
pub async fn save_config(
    State(state): State<AppState>,
    Json(request): Json<BTreeMap<String, String>>,
) -> ApiResult<Json<SaveConfigResponse>> {
    let mut saved = Vec::new();

    for (service, value) in &request {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        state.store.save_credential(service, value).await?;
        saved.push(service.clone());
    }

    info!(count = saved.len(), "Credentials saved");

    Ok(Json(SaveConfigResponse {
        saved,
        message: "Configuration saved successfully".to_string(),
    }))
}
