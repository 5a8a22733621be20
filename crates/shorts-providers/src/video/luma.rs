//! Luma video generation client (via the PiAPI gateway).

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::http::{download_to_file, ensure_success};
use crate::traits::VideoProvider;
use crate::video::{DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL};

const DEFAULT_BASE_URL: &str = "https://api.piapi.ai/api/luma";

/// Luma client.
pub struct LumaClient {
    api_key: String,
    base_url: String,
    client: Client,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
    /// Vertical format for Shorts
    aspect_ratio: &'static str,
    expand_prompt: bool,
}

#[derive(Debug, Deserialize)]
struct GenerationCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GenerationStatus {
    state: String,
    #[serde(default)]
    video: Option<VideoAsset>,
    #[serde(default)]
    failure_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoAsset {
    url: String,
}

impl LumaClient {
    /// Create a new client with the default polling budget.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the polling cadence.
    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts;
        self
    }

    async fn submit(&self, prompt: &str) -> ProviderResult<String> {
        let request = GenerationRequest {
            prompt,
            aspect_ratio: "9:16",
            expand_prompt: true,
        };

        let response = self
            .client
            .post(format!("{}/generations", self.base_url))
            .header("X-API-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let created: GenerationCreated = ensure_success(response).await?.json().await?;

        debug!(task_id = %created.id, "Submitted video generation");
        Ok(created.id)
    }

    async fn poll(&self, task_id: &str) -> ProviderResult<GenerationStatus> {
        let response = self
            .client
            .get(format!("{}/generations/{}", self.base_url, task_id))
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

#[async_trait]
impl VideoProvider for LumaClient {
    async fn generate(&self, prompt: &str, output: &Path) -> ProviderResult<PathBuf> {
        let task_id = self.submit(prompt).await?;

        for attempt in 1..=self.max_poll_attempts {
            tokio::time::sleep(self.poll_interval).await;

            let status = self.poll(&task_id).await?;
            debug!(
                task_id = %task_id,
                state = %status.state,
                attempt,
                max = self.max_poll_attempts,
                "Video generation status"
            );

            match status.state.as_str() {
                "completed" => {
                    let url = status
                        .video
                        .map(|v| v.url)
                        .ok_or_else(|| {
                            ProviderError::malformed("completed generation has no video URL")
                        })?;

                    download_to_file(&self.client, &url, output).await?;
                    info!(path = %output.display(), "Video generated");
                    return Ok(output.to_path_buf());
                }
                "failed" => {
                    return Err(ProviderError::remote_failed(
                        status
                            .failure_reason
                            .unwrap_or_else(|| "video generation failed".to_string()),
                    ));
                }
                // queued/dreaming: still running
                _ => {}
            }
        }

        Err(ProviderError::Timeout {
            attempts: self.max_poll_attempts,
        })
    }
}
