//! Pipeline job models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::video::VideoId;

/// Unique identifier for a pipeline job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Queued, waiting for the runner
    #[default]
    Pending,
    /// Actively running through pipeline stages
    Processing,
    /// Pipeline finished successfully
    Completed,
    /// Pipeline failed
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Parse from the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    /// Check if this is a terminal state (no more transitions permitted).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pipeline job. One job drives one video through the stage sequence;
/// a video may accumulate several jobs over resubmissions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Owning video
    pub video_id: VideoId,

    /// Processing status
    #[serde(default)]
    pub status: JobStatus,

    /// Progress percentage (0-100, non-decreasing while processing)
    #[serde(default)]
    pub progress: u8,

    /// Label of the step currently running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,

    /// Error message (set only on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// When the runner picked the job up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the job reached a terminal state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new pending job for a video.
    pub fn new(video_id: VideoId) -> Self {
        Self {
            id: JobId::new(),
            video_id,
            status: JobStatus::Pending,
            progress: 0,
            current_step: Some("Queued".to_string()),
            error_message: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Transition to processing.
    pub fn start(&mut self) {
        self.status = JobStatus::Processing;
        self.started_at = Some(Utc::now());
        self.progress = 0;
        self.current_step = Some("Initializing".to_string());
    }

    /// Record a stage checkpoint. Progress never decreases.
    pub fn checkpoint(&mut self, step: impl Into<String>, progress: u8) {
        self.current_step = Some(step.into());
        self.progress = self.progress.max(progress.min(100));
    }

    /// Mark as completed.
    pub fn complete(&mut self) {
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.current_step = Some("Completed".to_string());
        self.completed_at = Some(Utc::now());
    }

    /// Mark as failed, capturing the underlying error message verbatim.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.current_step = Some("Failed".to_string());
        self.error_message = Some(error.into());
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_is_pending_and_queued() {
        let job = Job::new(VideoId::new());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0);
        assert_eq!(job.current_step.as_deref(), Some("Queued"));
        assert!(job.started_at.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn lifecycle_pending_processing_completed() {
        let mut job = Job::new(VideoId::new());

        job.start();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.started_at.is_some());
        assert_eq!(job.current_step.as_deref(), Some("Initializing"));

        job.checkpoint("Generating voiceover", 25);
        assert_eq!(job.progress, 25);

        job.complete();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert!(job.status.is_terminal());
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn progress_is_monotonically_non_decreasing() {
        let mut job = Job::new(VideoId::new());
        job.start();
        job.checkpoint("Generating video", 40);
        job.checkpoint("stale write", 10);
        assert_eq!(job.progress, 40);
        job.checkpoint("Generating captions", 70);
        assert_eq!(job.progress, 70);
    }

    #[test]
    fn failure_captures_message_and_terminal_timestamp() {
        let mut job = Job::new(VideoId::new());
        job.start();
        job.checkpoint("Generating voiceover", 25);
        job.fail("speech synthesis request failed: 500 Internal Server Error");

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.error_message.as_deref(),
            Some("speech synthesis request failed: 500 Internal Server Error")
        );
        // Progress stops at the value reached when the failure occurred.
        assert_eq!(job.progress, 25);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
