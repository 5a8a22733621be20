//! Axum HTTP API for the Shorts Studio backend.
//!
//! The binary in this crate is the whole process: it opens the store,
//! starts the job runner as a background task and serves the dashboard
//! API. Handlers only read and write the store; pipeline stages run
//! exclusively on the runner task.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
