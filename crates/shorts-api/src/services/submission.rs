//! Submission facade.
//!
//! Validates the script, creates the video and job records in `pending`
//! state and returns both identifiers. Never blocks on the pipeline.

use shorts_models::{Job, JobId, Video, VideoId};
use shorts_store::Store;

use crate::error::{ApiError, ApiResult};

/// Identifiers returned to the client for polling.
#[derive(Debug, Clone)]
pub struct Submission {
    pub video_id: VideoId,
    pub job_id: JobId,
}

/// Create a video record and a queued job for it.
///
/// An empty or whitespace-only script is an input error; no records are
/// created in that case.
pub async fn submit_video(
    store: &Store,
    script: &str,
    title: Option<String>,
    description: Option<String>,
) -> ApiResult<Submission> {
    if script.trim().is_empty() {
        return Err(ApiError::validation("Script is required"));
    }

    let video = Video::new(script, title, description);
    store.create_video(&video).await?;

    let job = Job::new(video.id.clone());
    store.create_job(&job).await?;

    Ok(Submission {
        video_id: video.id,
        job_id: job.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::{JobStatus, VideoStatus};

    #[tokio::test]
    async fn submission_creates_pending_records() {
        let store = Store::in_memory().await.unwrap();

        let submission = submit_video(&store, "Honey never spoils.", None, None)
            .await
            .unwrap();

        let video = store.video(&submission.video_id).await.unwrap();
        assert_eq!(video.status, VideoStatus::Pending);
        assert_eq!(video.script, "Honey never spoils.");

        let job = store.job(&submission.job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.video_id, submission.video_id);
    }

    #[tokio::test]
    async fn whitespace_script_is_rejected_without_records() {
        let store = Store::in_memory().await.unwrap();

        let err = submit_video(&store, "   \n\t ", None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert!(store.list_videos(None, 10).await.unwrap().is_empty());
        assert!(store.list_jobs(None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn custom_title_is_preserved_until_metadata_stage() {
        let store = Store::in_memory().await.unwrap();

        let submission = submit_video(
            &store,
            "script",
            Some("My Working Title".into()),
            Some("desc".into()),
        )
        .await
        .unwrap();

        let video = store.video(&submission.video_id).await.unwrap();
        assert_eq!(video.title, "My Working Title");
        assert_eq!(video.description, "desc");
    }
}
