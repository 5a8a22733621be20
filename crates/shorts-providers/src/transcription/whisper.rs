//! OpenAI Whisper transcription client.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use shorts_models::{Transcript, TranscriptWord};

use crate::error::{ProviderError, ProviderResult};
use crate::http::ensure_success;
use crate::traits::TranscriptionProvider;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const MODEL: &str = "whisper-1";

/// Whisper client producing word-level timestamps.
pub struct WhisperClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    words: Option<Vec<WordSpan>>,
}

#[derive(Debug, Deserialize)]
struct WordSpan {
    word: String,
    start: f64,
    end: f64,
}

impl WhisperClient {
    /// Create a new client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn transcript_from_response(response: VerboseTranscription) -> ProviderResult<Transcript> {
    let words = response
        .words
        .ok_or_else(|| ProviderError::malformed("transcription has no word timestamps"))?;

    Ok(Transcript {
        words: words
            .into_iter()
            .map(|w| TranscriptWord {
                word: w.word,
                start: w.start,
                end: w.end,
            })
            .collect(),
    })
}

#[async_trait]
impl TranscriptionProvider for WhisperClient {
    async fn transcribe(&self, audio: &Path) -> ProviderResult<Transcript> {
        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(ProviderError::Http)?;

        let form = Form::new()
            .text("model", MODEL)
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word")
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let response: VerboseTranscription = ensure_success(response).await?.json().await?;

        let transcript = transcript_from_response(response)?;
        debug!(words = transcript.words.len(), "Transcription complete");
        Ok(transcript)
    }
}
