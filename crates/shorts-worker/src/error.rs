//! Worker error types.

use std::fmt;

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// The pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ContentMetadata,
    Voiceover,
    VideoSynthesis,
    Captions,
    Assembly,
    Publish,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ContentMetadata => "content metadata",
            Stage::Voiceover => "voiceover",
            Stage::VideoSynthesis => "video synthesis",
            Stage::Captions => "captions",
            Stage::Assembly => "assembly",
            Stage::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stage error: which stage failed plus the underlying message.
///
/// The message is persisted verbatim as the job's `error_message`; the
/// stage name is used for logging only.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {message}")]
pub struct StageFailure {
    pub stage: Stage,
    pub message: String,
}

impl StageFailure {
    /// Capture the display form of the underlying error.
    pub fn new(stage: Stage, error: impl fmt::Display) -> Self {
        Self {
            stage,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    /// A pipeline stage failed; caught at the runner's single catch
    /// boundary and converted into terminal job/video state.
    #[error(transparent)]
    Stage(#[from] StageFailure),

    /// A required credential or setting is absent; the job fails
    /// immediately before any stage runs.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The persistent store itself failed; bubbles out of the job to the
    /// runner loop.
    #[error("Store error: {0}")]
    Store(#[from] shorts_store::StoreError),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_failure_preserves_underlying_message() {
        let failure = StageFailure::new(Stage::Voiceover, "connection reset");
        assert_eq!(failure.message, "connection reset");
        assert_eq!(failure.to_string(), "voiceover stage failed: connection reset");
    }
}
