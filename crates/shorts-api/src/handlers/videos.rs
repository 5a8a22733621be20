//! Video handlers: submission, inspection, download and publish.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tracing::info;

use shorts_models::{ContentMetadata, Video, VideoId};
use shorts_providers::{UploadProvider, YouTubeClient};

use crate::error::{ApiError, ApiResult};
use crate::handlers::{parse_video_status, DEFAULT_LIMIT};
use crate::metrics::record_job_enqueued;
use crate::services::submit_video;
use crate::state::AppState;

/// Submission request.
#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub script: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Submission response.
#[derive(Serialize)]
pub struct CreateVideoResponse {
    pub video_id: String,
    pub job_id: String,
    pub message: String,
}

/// POST /api/videos/create
///
/// The submission facade: creates a pending video and job, wakes the
/// runner, returns both identifiers. Does not block on the pipeline.
pub async fn create_video(
    State(state): State<AppState>,
    Json(request): Json<CreateVideoRequest>,
) -> ApiResult<Json<CreateVideoResponse>> {
    let submission = submit_video(
        &state.store,
        &request.script,
        request.title,
        request.description,
    )
    .await?;

    state.runner.notify_submission();
    record_job_enqueued();

    info!(
        video_id = %submission.video_id,
        job_id = %submission.job_id,
        "Video submitted"
    );

    Ok(Json(CreateVideoResponse {
        video_id: submission.video_id.to_string(),
        job_id: submission.job_id.to_string(),
        message: "Video creation started".to_string(),
    }))
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// GET /api/videos
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Video>>> {
    let status = parse_video_status(query.status.as_deref())?;
    let videos = state
        .store
        .list_videos(status, query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(videos))
}

/// GET /api/videos/:video_id
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<Video>> {
    let video = state.store.video(&VideoId::from(video_id)).await?;
    Ok(Json(video))
}

/// GET /api/videos/:video_id/download
///
/// Streams the final media file as an attachment. Fails when the video has
/// no output path yet or the file is gone from disk.
pub async fn download_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Response> {
    let video = state.store.video(&VideoId::from(video_id)).await?;

    let path = video
        .video_path
        .ok_or_else(|| ApiError::not_found("Video is not ready for download"))?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::not_found("Video file not found on disk"))?;

    let filename = format!("{}.mp4", video.title.replace(['"', '\\', '/'], "_"));
    let stream = ReaderStream::new(file);

    Response::builder()
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::internal(format!("failed to build response: {e}")))
}

/// Publish response.
#[derive(Serialize)]
pub struct PublishResponse {
    pub youtube_id: String,
    pub youtube_url: String,
}

/// POST /api/videos/:video_id/publish
///
/// The optional publish operation, outside the core pipeline loop. Requires
/// a completed video and the YouTube OAuth credentials.
pub async fn publish_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<PublishResponse>> {
    let video = state.store.video(&VideoId::from(video_id)).await?;

    let path = match (&video.status, &video.video_path) {
        (shorts_models::VideoStatus::Completed, Some(path)) => path.clone(),
        _ => {
            return Err(ApiError::conflict(
                "Video must be completed before publishing",
            ))
        }
    };

    let client = youtube_client(&state).await?;

    let metadata = ContentMetadata {
        title: video.title.clone(),
        description: video.description.clone(),
        tags: video.tags.clone(),
        hashtags: Vec::new(),
    };

    let youtube_id = client
        .upload(std::path::Path::new(&path), &metadata)
        .await?;
    let youtube_url = format!("https://www.youtube.com/watch?v={youtube_id}");

    state
        .store
        .set_video_published(&video.id, &youtube_id, &youtube_url)
        .await?;

    info!(video_id = %video.id, youtube_id = %youtube_id, "Video published");

    Ok(Json(PublishResponse {
        youtube_id,
        youtube_url,
    }))
}

/// Build the YouTube client from stored credentials.
async fn youtube_client(state: &AppState) -> ApiResult<YouTubeClient> {
    let client_id = require_credential(state, "youtube_client_id").await?;
    let client_secret = require_credential(state, "youtube_client_secret").await?;
    let refresh_token = require_credential(state, "youtube_refresh_token").await?;
    Ok(YouTubeClient::new(client_id, client_secret, refresh_token))
}

async fn require_credential(state: &AppState, service: &'static str) -> ApiResult<String> {
    state.store.credential(service).await?.ok_or_else(|| {
        ApiError::from(shorts_providers::ProviderError::missing_credential(service))
    })
}
