//! Dashboard statistics handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use shorts_models::{JobStatus, VideoStatus};

use crate::error::ApiResult;
use crate::state::AppState;

/// Dashboard counters.
#[derive(Serialize)]
pub struct StatsResponse {
    pub total_videos: i64,
    pub pending_videos: i64,
    pub completed_videos: i64,
    pub failed_videos: i64,
    pub total_jobs: i64,
    pub pending_jobs: i64,
    pub processing_jobs: i64,
    pub completed_jobs: i64,
    pub failed_jobs: i64,
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let store = &state.store;

    let pending_videos = store.count_videos(VideoStatus::Pending).await?;
    let completed_videos = store.count_videos(VideoStatus::Completed).await?;
    let failed_videos = store.count_videos(VideoStatus::Failed).await?;

    let pending_jobs = store.count_jobs(JobStatus::Pending).await?;
    let processing_jobs = store.count_jobs(JobStatus::Processing).await?;
    let completed_jobs = store.count_jobs(JobStatus::Completed).await?;
    let failed_jobs = store.count_jobs(JobStatus::Failed).await?;

    Ok(Json(StatsResponse {
        total_videos: pending_videos + completed_videos + failed_videos,
        pending_videos,
        completed_videos,
        failed_videos,
        total_jobs: pending_jobs + processing_jobs + completed_jobs + failed_jobs,
        pending_jobs,
        processing_jobs,
        completed_jobs,
        failed_jobs,
    }))
}
