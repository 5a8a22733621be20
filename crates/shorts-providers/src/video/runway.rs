//! Runway video generation client.

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

const DEFAULT_BASE_URL: &str = "https://api.runwayml.com/v1";
const MODEL: &str = "gen3a_turbo";
/// Clip length requested from Runway, in seconds.
const CLIP_DURATION_SECS: u32 = 5;

/// Runway Gen-3 client.
pub struct RunwayClient {
    api_key: String,
    base_url: String,
    client: Client,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'static str,
    prompt: &'a str,
    duration: u32,
    /// Vertical format for Shorts
    ratio: &'static str,
}

#[derive(Debug, Deserialize)]
struct TaskCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TaskStatus {
    status: String,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    failure: Option<String>,
}

impl RunwayClient {
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
            model: MODEL,
            prompt,
            duration: CLIP_DURATION_SECS,
            ratio: "9:16",
        };

        let response = self
            .client
            .post(format!("{}/video/generate", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let created: TaskCreated = ensure_success(response).await?.json().await?;

        debug!(task_id = %created.id, "Submitted video generation");
        Ok(created.id)
    }

    async fn poll(&self, task_id: &str) -> ProviderResult<TaskStatus> {
        let response = self
            .client
            .get(format!("{}/tasks/{}", self.base_url, task_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

#[async_trait]
impl VideoProvider for RunwayClient {
    async fn generate(&self, prompt: &str, output: &Path) -> ProviderResult<PathBuf> {
        let task_id = self.submit(prompt).await?;

        for attempt in 1..=self.max_poll_attempts {
            tokio::time::sleep(self.poll_interval).await;

            let status = self.poll(&task_id).await?;
            debug!(
                task_id = %task_id,
                status = %status.status,
                attempt,
                max = self.max_poll_attempts,
                "Video generation status"
            );

            match status.status.as_str() {
                "SUCCEEDED" => {
                    let url = status
                        .output
                        .and_then(|urls| urls.into_iter().next())
                        .ok_or_else(|| {
                            ProviderError::malformed("succeeded task has no output URL")
                        })?;

                    download_to_file(&self.client, &url, output).await?;
                    info!(path = %output.display(), "Video generated");
                    return Ok(output.to_path_buf());
                }
                "FAILED" => {
                    return Err(ProviderError::remote_failed(
                        status
                            .failure
                            .unwrap_or_else(|| "video generation failed".to_string()),
                    ));
                }
                // PENDING/RUNNING: still in flight
                _ => {}
            }
        }

        Err(ProviderError::Timeout {
            attempts: self.max_poll_attempts,
        })
    }
}
