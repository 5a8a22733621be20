//! Stage construction.
//!
//! Providers are built per job from decrypted credentials. A missing
//! required credential is a configuration error raised before any stage
//! runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use shorts_media::{assemble_video, extract_thumbnail, probe_media, MediaResult};
use shorts_providers::{
    ContentProvider, ContentService, ElevenLabsClient, GeminiClient, LumaClient,
    OpenAiContentClient, OpenAiSpeechClient, RunwayClient, SpeechProvider, SpeechService,
    TranscriptionProvider, VideoProvider, VideoService, WhisperClient,
};
use shorts_store::Store;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};

/// What the assembly stage produces.
#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    /// Path of the muxed final video
    pub video_path: PathBuf,
    /// Extracted thumbnail, when available
    pub thumbnail_path: Option<PathBuf>,
    /// Probed duration in whole seconds, when available
    pub duration_secs: Option<u32>,
}

/// The local assembly step, abstracted so pipeline tests can run without
/// FFmpeg installed.
#[async_trait]
pub trait Assembler: Send + Sync {
    async fn assemble(
        &self,
        video: &Path,
        audio: &Path,
        captions: Option<&Path>,
        output_dir: &Path,
    ) -> MediaResult<AssemblyOutput>;
}

/// FFmpeg-backed assembler used in production.
pub struct FfmpegAssembler;

#[async_trait]
impl Assembler for FfmpegAssembler {
    async fn assemble(
        &self,
        video: &Path,
        audio: &Path,
        captions: Option<&Path>,
        output_dir: &Path,
    ) -> MediaResult<AssemblyOutput> {
        let final_path = output_dir.join("final_video.mp4");
        assemble_video(video, audio, captions, &final_path).await?;

        // Thumbnail and duration are enrichments; their failure does not
        // fail the assembly stage.
        let thumbnail_path = match extract_thumbnail(&final_path, &output_dir.join("thumbnail.jpg"))
            .await
        {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Thumbnail extraction failed: {}", e);
                None
            }
        };

        let duration_secs = match probe_media(&final_path).await {
            Ok(info) => Some(info.duration.round() as u32),
            Err(e) => {
                warn!("Probing final video failed: {}", e);
                None
            }
        };

        Ok(AssemblyOutput {
            video_path: final_path,
            thumbnail_path,
            duration_secs,
        })
    }
}

/// One constructed provider per pipeline stage.
pub struct Stages {
    pub content: Box<dyn ContentProvider>,
    pub speech: Box<dyn SpeechProvider>,
    pub video: Box<dyn VideoProvider>,
    pub transcription: Box<dyn TranscriptionProvider>,
    pub assembler: Box<dyn Assembler>,
}

impl std::fmt::Debug for Stages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stages").finish_non_exhaustive()
    }
}

/// Builds the stage set for a job. The production implementation resolves
/// credentials from the store; tests substitute stubs.
#[async_trait]
pub trait StageSource: Send + Sync {
    async fn stages(&self, store: &Store) -> WorkerResult<Stages>;
}

/// Production stage source: selects concrete providers from configuration
/// and decrypted credentials.
pub struct ConfiguredStages {
    config: WorkerConfig,
}

impl ConfiguredStages {
    pub fn new(config: WorkerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StageSource for ConfiguredStages {
    async fn stages(&self, store: &Store) -> WorkerResult<Stages> {
        let settings = self.config.settings;

        let content: Box<dyn ContentProvider> = match settings.content {
            ContentService::Gemini => {
                Box::new(GeminiClient::new(require_credential(store, "gemini").await?))
            }
            ContentService::Gpt4 => Box::new(OpenAiContentClient::new(
                require_credential(store, "openai").await?,
            )),
        };

        let speech: Box<dyn SpeechProvider> = match settings.speech {
            SpeechService::OpenAi => Box::new(OpenAiSpeechClient::new(
                require_credential(store, "openai").await?,
            )),
            SpeechService::ElevenLabs => Box::new(ElevenLabsClient::new(
                require_credential(store, "elevenlabs").await?,
            )),
        };

        let video: Box<dyn VideoProvider> = match settings.video {
            VideoService::Luma => Box::new(
                LumaClient::new(require_credential(store, "luma").await?).with_polling(
                    self.config.video_poll_interval,
                    self.config.video_poll_attempts,
                ),
            ),
            VideoService::Runway => Box::new(
                RunwayClient::new(require_credential(store, "runway").await?).with_polling(
                    self.config.video_poll_interval,
                    self.config.video_poll_attempts,
                ),
            ),
        };

        let transcription: Box<dyn TranscriptionProvider> =
            Box::new(WhisperClient::new(require_credential(store, "openai").await?));

        Ok(Stages {
            content,
            speech,
            video,
            transcription,
            assembler: Box::new(FfmpegAssembler),
        })
    }
}

/// Resolve a credential or fail with a configuration error.
async fn require_credential(store: &Store, service: &str) -> WorkerResult<String> {
    store
        .credential(service)
        .await?
        .ok_or_else(|| WorkerError::config(format!("Missing credential for {service}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credential_is_a_configuration_error() {
        let store = Store::in_memory().await.unwrap();
        let source = ConfiguredStages::new(WorkerConfig::default());

        let err = source.stages(&store).await.unwrap_err();
        match err {
            WorkerError::Config(msg) => assert!(msg.contains("gemini")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn full_credential_set_builds_all_stages() {
        let store = Store::in_memory().await.unwrap();
        for (service, key) in [("gemini", "g"), ("openai", "o"), ("luma", "l")] {
            store.save_credential(service, key).await.unwrap();
        }

        let source = ConfiguredStages::new(WorkerConfig::default());
        assert!(source.stages(&store).await.is_ok());
    }
}
