//! Job repository.
//!
//! The runner is the only writer after creation; every mutation here is a
//! single self-contained statement so a checkpoint is durable before the
//! stage it announces starts running.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use shorts_models::{Job, JobId, JobStatus, VideoId};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

#[derive(FromRow)]
struct JobRow {
    id: String,
    video_id: String,
    status: String,
    progress: i64,
    current_step: Option<String>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<JobRow> for Job {
    type Error = StoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = JobStatus::parse(&row.status)
            .ok_or_else(|| StoreError::invalid_record(format!("job status {:?}", row.status)))?;

        Ok(Job {
            id: JobId::from(row.id),
            video_id: VideoId::from(row.video_id),
            status,
            progress: row.progress.clamp(0, 100) as u8,
            current_step: row.current_step,
            error_message: row.error_message,
            created_at: row.created_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
        })
    }
}

impl Store {
    /// Insert a new job record.
    pub async fn create_job(&self, job: &Job) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, video_id, status, progress, current_step, error_message,
                              created_at, started_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job.id.as_str())
        .bind(job.video_id.as_str())
        .bind(job.status.as_str())
        .bind(job.progress as i64)
        .bind(&job.current_step)
        .bind(&job.error_message)
        .bind(job.created_at)
        .bind(job.started_at)
        .bind(job.completed_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Fetch a job by ID.
    pub async fn job(&self, id: &JobId) -> StoreResult<Job> {
        let row: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;

        row.ok_or_else(|| StoreError::not_found("Job", id.as_str()))?
            .try_into()
    }

    /// The single oldest pending job, if any (FIFO by creation time).
    pub async fn next_pending_job(&self) -> StoreResult<Option<Job>> {
        let row: Option<JobRow> = sqlx::query_as(
            "SELECT * FROM jobs WHERE status = 'pending' ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await?;

        row.map(Job::try_from).transpose()
    }

    /// List jobs, newest first, optionally filtered by status.
    pub async fn list_jobs(&self, status: Option<JobStatus>, limit: u32) -> StoreResult<Vec<Job>> {
        let rows: Vec<JobRow> = match status {
            Some(status) => {
                sqlx::query_as(
                    "SELECT * FROM jobs WHERE status = ? ORDER BY created_at DESC LIMIT ?",
                )
                .bind(status.as_str())
                .bind(limit as i64)
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM jobs ORDER BY created_at DESC LIMIT ?")
                    .bind(limit as i64)
                    .fetch_all(self.pool())
                    .await?
            }
        };

        rows.into_iter().map(Job::try_from).collect()
    }

    /// Count jobs in a given status.
    pub async fn count_jobs(&self, status: JobStatus) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Transition a job to processing: record the start time, reset progress
    /// and announce the initial step.
    pub async fn mark_job_processing(&self, id: &JobId) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'processing', started_at = ?, progress = 0,
                current_step = 'Initializing'
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Persist a stage checkpoint. Progress never moves backwards.
    pub async fn checkpoint_job(&self, id: &JobId, step: &str, progress: u8) -> StoreResult<()> {
        sqlx::query("UPDATE jobs SET current_step = ?, progress = MAX(progress, ?) WHERE id = ?")
            .bind(step)
            .bind(progress.min(100) as i64)
            .bind(id.as_str())
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Mark a job completed.
    pub async fn complete_job(&self, id: &JobId) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'completed', progress = 100, current_step = 'Completed',
                completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Mark a job failed, capturing the error message verbatim.
    pub async fn fail_job(&self, id: &JobId, error_message: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'failed', current_step = 'Failed', error_message = ?,
                completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(error_message)
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::Video;

    async fn store_with_video() -> (Store, Video) {
        let store = Store::in_memory().await.unwrap();
        let video = Video::new("script", None, None);
        store.create_video(&video).await.unwrap();
        (store, video)
    }

    #[tokio::test]
    async fn next_pending_job_is_fifo() {
        let (store, video) = store_with_video().await;

        let first = Job::new(video.id.clone());
        store.create_job(&first).await.unwrap();
        let second = Job::new(video.id.clone());
        store.create_job(&second).await.unwrap();

        let picked = store.next_pending_job().await.unwrap().unwrap();
        assert_eq!(picked.id, first.id);

        // Once the first job leaves pending, the second becomes eligible.
        store.mark_job_processing(&first.id).await.unwrap();
        let picked = store.next_pending_job().await.unwrap().unwrap();
        assert_eq!(picked.id, second.id);
    }

    #[tokio::test]
    async fn empty_queue_yields_none() {
        let store = Store::in_memory().await.unwrap();
        assert!(store.next_pending_job().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn processing_transition_resets_progress() {
        let (store, video) = store_with_video().await;
        let job = Job::new(video.id.clone());
        store.create_job(&job).await.unwrap();

        store.mark_job_processing(&job.id).await.unwrap();
        let fetched = store.job(&job.id).await.unwrap();

        assert_eq!(fetched.status, JobStatus::Processing);
        assert_eq!(fetched.progress, 0);
        assert_eq!(fetched.current_step.as_deref(), Some("Initializing"));
        assert!(fetched.started_at.is_some());
        assert!(fetched.completed_at.is_none());
    }

    #[tokio::test]
    async fn checkpoints_never_move_progress_backwards() {
        let (store, video) = store_with_video().await;
        let job = Job::new(video.id.clone());
        store.create_job(&job).await.unwrap();
        store.mark_job_processing(&job.id).await.unwrap();

        store
            .checkpoint_job(&job.id, "Generating video", 40)
            .await
            .unwrap();
        store
            .checkpoint_job(&job.id, "stale write", 10)
            .await
            .unwrap();

        let fetched = store.job(&job.id).await.unwrap();
        assert_eq!(fetched.progress, 40);
        assert_eq!(fetched.current_step.as_deref(), Some("stale write"));
    }

    #[tokio::test]
    async fn failure_records_message_and_completed_at() {
        let (store, video) = store_with_video().await;
        let job = Job::new(video.id.clone());
        store.create_job(&job).await.unwrap();
        store.mark_job_processing(&job.id).await.unwrap();
        store
            .checkpoint_job(&job.id, "Generating voiceover", 25)
            .await
            .unwrap();

        store
            .fail_job(&job.id, "speech provider returned 500")
            .await
            .unwrap();

        let fetched = store.job(&job.id).await.unwrap();
        assert_eq!(fetched.status, JobStatus::Failed);
        assert_eq!(
            fetched.error_message.as_deref(),
            Some("speech provider returned 500")
        );
        assert_eq!(fetched.progress, 25);
        assert!(fetched.completed_at.is_some());
    }

    #[tokio::test]
    async fn counts_by_status() {
        let (store, video) = store_with_video().await;

        let a = Job::new(video.id.clone());
        store.create_job(&a).await.unwrap();
        let b = Job::new(video.id.clone());
        store.create_job(&b).await.unwrap();
        store.mark_job_processing(&a.id).await.unwrap();

        assert_eq!(store.count_jobs(JobStatus::Pending).await.unwrap(), 1);
        assert_eq!(store.count_jobs(JobStatus::Processing).await.unwrap(), 1);
        assert_eq!(store.count_jobs(JobStatus::Completed).await.unwrap(), 0);
    }
}
