//! Shared data models for the Shorts Studio backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video records and their lifecycle status
//! - Pipeline jobs and progress tracking
//! - Generated content metadata (title, description, tags)
//! - Word-level transcripts used for caption generation
//! - Recurrence schedules

pub mod job;
pub mod metadata;
pub mod schedule;
pub mod transcript;
pub mod video;

// Re-export common types
pub use job::{Job, JobId, JobStatus};
pub use metadata::ContentMetadata;
pub use schedule::{Schedule, ScheduleFrequency};
pub use transcript::{Transcript, TranscriptWord};
pub use video::{Video, VideoId, VideoStatus};
