//! Application state.

use shorts_providers::ProviderSettings;
use shorts_store::Store;
use shorts_worker::RunnerHandle;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Store,
    pub runner: RunnerHandle,
    pub settings: ProviderSettings,
}
