//! HTTP handlers.

pub mod health;
pub mod jobs;
pub mod schedules;
pub mod settings;
pub mod stats;
pub mod videos;

use shorts_models::{JobStatus, VideoStatus};

use crate::error::{ApiError, ApiResult};

/// Default listing page size.
pub(crate) const DEFAULT_LIMIT: u32 = 50;

/// Parse an optional `status` query value into a video status.
pub(crate) fn parse_video_status(status: Option<&str>) -> ApiResult<Option<VideoStatus>> {
    match status {
        None => Ok(None),
        Some(s) => VideoStatus::parse(s)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("Unknown video status {s:?}"))),
    }
}

/// Parse an optional `status` query value into a job status.
pub(crate) fn parse_job_status(status: Option<&str>) -> ApiResult<Option<JobStatus>> {
    match status {
        None => Ok(None),
        Some(s) => JobStatus::parse(s)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("Unknown job status {s:?}"))),
    }
}
