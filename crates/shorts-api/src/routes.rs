//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::health::health;
use crate::handlers::jobs::{get_job, list_jobs, queue_status};
use crate::handlers::schedules::{create_schedule, list_schedules};
use crate::handlers::settings::{config_status, save_config};
use crate::handlers::stats::stats;
use crate::handlers::videos::{
    create_video, download_video, get_video, list_videos, publish_video,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, create_rate_limiter, rate_limit_middleware, request_id, request_logging,
    security_headers,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Submissions are rate-limited; everything else is cheap store reads.
    let rate_limiter = create_rate_limiter(state.config.rate_limit_rps);

    let video_routes = Router::new()
        .route(
            "/videos/create",
            post(create_video).layer(middleware::from_fn_with_state(
                rate_limiter,
                rate_limit_middleware,
            )),
        )
        .route("/videos", get(list_videos))
        .route("/videos/:video_id", get(get_video))
        .route("/videos/:video_id/download", get(download_video))
        .route("/videos/:video_id/publish", post(publish_video));

    let job_routes = Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/queue/status", get(queue_status))
        .route("/jobs/:job_id", get(get_job));

    let config_routes = Router::new()
        .route("/config/status", get(config_status))
        .route("/config/save", post(save_config));

    let schedule_routes = Router::new()
        .route("/schedules", get(list_schedules))
        .route("/schedules/create", post(create_schedule));

    let api_routes = Router::new()
        .merge(video_routes)
        .merge(job_routes)
        .merge(config_routes)
        .merge(schedule_routes)
        .route("/stats", get(stats));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
