//! Stage capability traits.
//!
//! One trait per pipeline stage. The concrete provider is chosen once at
//! construction time from [`crate::ProviderSettings`]; the runner only ever
//! sees the trait object.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use shorts_models::{ContentMetadata, Transcript};

use crate::error::ProviderResult;

/// Generates title/description/tags from a script.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate(&self, script: &str) -> ProviderResult<ContentMetadata>;
}

/// Synthesizes a voiceover audio file from text.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Write the synthesized audio to `output` and return the path.
    async fn synthesize(&self, text: &str, output: &Path) -> ProviderResult<PathBuf>;
}

/// Generates a video clip from a text prompt.
///
/// Implementations follow a submit-then-poll protocol with a bounded number
/// of attempts; exhausting the budget yields a timeout error distinct from
/// a remote failure.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Write the generated video to `output` and return the path.
    async fn generate(&self, prompt: &str, output: &Path) -> ProviderResult<PathBuf>;
}

/// Produces a word-level transcript of an audio file.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> ProviderResult<Transcript>;
}

/// Uploads a finished video to a sharing platform.
#[async_trait]
pub trait UploadProvider: Send + Sync {
    /// Upload the video and return the remote identifier.
    async fn upload(&self, video: &Path, metadata: &ContentMetadata) -> ProviderResult<String>;
}
