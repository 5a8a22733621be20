//! Video repository.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use shorts_models::{Video, VideoId, VideoStatus};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

/// Default listing page size.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

#[derive(FromRow)]
struct VideoRow {
    id: String,
    title: String,
    description: String,
    script: String,
    video_path: Option<String>,
    thumbnail_path: Option<String>,
    youtube_id: Option<String>,
    youtube_url: Option<String>,
    status: String,
    tags: String,
    duration_secs: Option<i64>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<VideoRow> for Video {
    type Error = StoreError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        let status = VideoStatus::parse(&row.status)
            .ok_or_else(|| StoreError::invalid_record(format!("video status {:?}", row.status)))?;
        let tags: Vec<String> = serde_json::from_str(&row.tags)?;

        Ok(Video {
            id: VideoId::from(row.id),
            title: row.title,
            description: row.description,
            script: row.script,
            video_path: row.video_path,
            thumbnail_path: row.thumbnail_path,
            youtube_id: row.youtube_id,
            youtube_url: row.youtube_url,
            status,
            tags,
            duration_secs: row.duration_secs.map(|d| d as u32),
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

impl Store {
    /// Insert a new video record.
    pub async fn create_video(&self, video: &Video) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, title, description, script, video_path, thumbnail_path,
                                youtube_id, youtube_url, status, tags, duration_secs,
                                created_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(video.id.as_str())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.script)
        .bind(&video.video_path)
        .bind(&video.thumbnail_path)
        .bind(&video.youtube_id)
        .bind(&video.youtube_url)
        .bind(video.status.as_str())
        .bind(serde_json::to_string(&video.tags)?)
        .bind(video.duration_secs.map(|d| d as i64))
        .bind(video.created_at)
        .bind(video.completed_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Fetch a video by ID.
    pub async fn video(&self, id: &VideoId) -> StoreResult<Video> {
        let row: Option<VideoRow> = sqlx::query_as("SELECT * FROM videos WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;

        row.ok_or_else(|| StoreError::not_found("Video", id.as_str()))?
            .try_into()
    }

    /// List videos, newest first, optionally filtered by status.
    pub async fn list_videos(
        &self,
        status: Option<VideoStatus>,
        limit: u32,
    ) -> StoreResult<Vec<Video>> {
        let rows: Vec<VideoRow> = match status {
            Some(status) => {
                sqlx::query_as(
                    "SELECT * FROM videos WHERE status = ? ORDER BY created_at DESC LIMIT ?",
                )
                .bind(status.as_str())
                .bind(limit as i64)
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM videos ORDER BY created_at DESC LIMIT ?")
                    .bind(limit as i64)
                    .fetch_all(self.pool())
                    .await?
            }
        };

        rows.into_iter().map(Video::try_from).collect()
    }

    /// Count videos in a given status.
    pub async fn count_videos(&self, status: VideoStatus) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Write AI-generated metadata onto a video (content metadata stage).
    pub async fn set_video_metadata(
        &self,
        id: &VideoId,
        title: &str,
        description: &str,
        tags: &[String],
    ) -> StoreResult<()> {
        sqlx::query("UPDATE videos SET title = ?, description = ?, tags = ? WHERE id = ?")
            .bind(title)
            .bind(description)
            .bind(serde_json::to_string(tags)?)
            .bind(id.as_str())
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Mark a video completed with its rendered artifacts.
    pub async fn set_video_completed(
        &self,
        id: &VideoId,
        video_path: &str,
        thumbnail_path: Option<&str>,
        duration_secs: Option<u32>,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE videos
            SET video_path = ?, thumbnail_path = ?, duration_secs = ?,
                status = 'completed', completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(video_path)
        .bind(thumbnail_path)
        .bind(duration_secs.map(|d| d as i64))
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Mark a video failed.
    pub async fn set_video_failed(&self, id: &VideoId) -> StoreResult<()> {
        sqlx::query("UPDATE videos SET status = 'failed', completed_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id.as_str())
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Record the remote identifiers after a publish.
    pub async fn set_video_published(
        &self,
        id: &VideoId,
        youtube_id: &str,
        youtube_url: &str,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE videos SET youtube_id = ?, youtube_url = ? WHERE id = ?")
            .bind(youtube_id)
            .bind(youtube_url)
            .bind(id.as_str())
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
