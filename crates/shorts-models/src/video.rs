//! Video record models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Video lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    /// Waiting for (or undergoing) pipeline processing
    #[default]
    Pending,
    /// Final video rendered successfully
    Completed,
    /// Pipeline failed
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        }
    }

    /// Parse from the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(VideoStatus::Pending),
            "completed" => Some(VideoStatus::Completed),
            "failed" => Some(VideoStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A video record: the script that drives the pipeline plus everything the
/// pipeline produces for it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Video {
    /// Unique video ID
    pub id: VideoId,

    /// Video title (AI-generated at the metadata stage unless supplied)
    pub title: String,

    /// Video description
    pub description: String,

    /// Source script the pipeline runs on
    pub script: String,

    /// Path to the final rendered video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,

    /// Path to the extracted thumbnail frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,

    /// YouTube video ID (set by the publish operation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_id: Option<String>,

    /// YouTube watch URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: VideoStatus,

    /// Search tags (AI-generated)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Duration of the final video in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Completion timestamp (success or failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Video {
    /// Create a new pending video from a script.
    ///
    /// Title and description fall back to placeholders until the content
    /// metadata stage overwrites them.
    pub fn new(
        script: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: VideoId::new(),
            title: title.unwrap_or_else(|| "Untitled Video".to_string()),
            description: description.unwrap_or_default(),
            script: script.into(),
            video_path: None,
            thumbnail_path: None,
            youtube_id: None,
            youtube_url: None,
            status: VideoStatus::Pending,
            tags: Vec::new(),
            duration_secs: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Mark as completed with the final output path.
    pub fn complete(&mut self, video_path: impl Into<String>) {
        self.video_path = Some(video_path.into());
        self.status = VideoStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark as failed.
    pub fn fail(&mut self) {
        self.status = VideoStatus::Failed;
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_generation_is_unique() {
        assert_ne!(VideoId::new(), VideoId::new());
    }

    #[test]
    fn new_video_is_pending_with_placeholder_title() {
        let video = Video::new("Honey never spoils.", None, None);
        assert_eq!(video.status, VideoStatus::Pending);
        assert_eq!(video.title, "Untitled Video");
        assert!(video.video_path.is_none());
        assert!(video.completed_at.is_none());
    }

    #[test]
    fn complete_sets_path_and_timestamp() {
        let mut video = Video::new("script", Some("My Short".into()), None);
        video.complete("output/video_1/final_video.mp4");
        assert_eq!(video.status, VideoStatus::Completed);
        assert_eq!(
            video.video_path.as_deref(),
            Some("output/video_1/final_video.mp4")
        );
        assert!(video.completed_at.is_some());
    }

    #[test]
    fn status_round_trips_through_persisted_form() {
        for status in [
            VideoStatus::Pending,
            VideoStatus::Completed,
            VideoStatus::Failed,
        ] {
            assert_eq!(VideoStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(VideoStatus::parse("bogus"), None);
    }
}
