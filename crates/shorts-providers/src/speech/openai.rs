//! OpenAI text-to-speech client.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::ProviderResult;
use crate::http::ensure_success;
use crate::traits::SpeechProvider;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const MODEL: &str = "tts-1";
const VOICE: &str = "alloy";

/// OpenAI TTS client.
pub struct OpenAiSpeechClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'static str,
    voice: &'static str,
    input: &'a str,
    speed: f32,
}

impl OpenAiSpeechClient {
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

#[async_trait]
impl SpeechProvider for OpenAiSpeechClient {
    async fn synthesize(&self, text: &str, output: &Path) -> ProviderResult<PathBuf> {
        let request = SpeechRequest {
            model: MODEL,
            voice: VOICE,
            input: text,
            speed: 1.0,
        };

        let response = self
            .client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, &bytes).await?;

        debug!(path = %output.display(), bytes = bytes.len(), "Voiceover written");
        Ok(output.to_path_buf())
    }
}
