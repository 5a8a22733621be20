//! Job inspection and queue status handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use shorts_models::{Job, JobId, JobStatus};

use crate::error::ApiResult;
use crate::handlers::videos::ListQuery;
use crate::handlers::{parse_job_status, DEFAULT_LIMIT};
use crate::state::AppState;

/// GET /api/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Job>>> {
    let status = parse_job_status(query.status.as_deref())?;
    let jobs = state
        .store
        .list_jobs(status, query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(jobs))
}

/// GET /api/jobs/:job_id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Job>> {
    let job = state.store.job(&JobId::from(job_id)).await?;
    Ok(Json(job))
}

/// Queue status response.
#[derive(Serialize)]
pub struct QueueStatusResponse {
    /// Whether the runner loop is alive
    pub running: bool,
    /// Job currently being processed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_job: Option<String>,
    /// Number of jobs waiting in the queue
    pub pending_jobs: i64,
    /// Number of jobs being processed (0 or 1)
    pub processing_jobs: i64,
}

/// GET /api/jobs/queue/status
pub async fn queue_status(
    State(state): State<AppState>,
) -> ApiResult<Json<QueueStatusResponse>> {
    Ok(Json(QueueStatusResponse {
        running: state.runner.is_running(),
        current_job: state.runner.current_job().map(|id| id.to_string()),
        pending_jobs: state.store.count_jobs(JobStatus::Pending).await?,
        processing_jobs: state.store.count_jobs(JobStatus::Processing).await?,
    }))
}
