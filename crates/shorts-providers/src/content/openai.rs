//! OpenAI chat client for content metadata generation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shorts_models::ContentMetadata;

use crate::content::{extract_json_block, metadata_prompt};
use crate::error::{ProviderError, ProviderResult};
use crate::http::ensure_success;
use crate::traits::ContentProvider;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const MODEL: &str = "gpt-4o";

/// OpenAI chat-completions client for content metadata generation.
pub struct OpenAiContentClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAiContentClient {
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
impl ContentProvider for OpenAiContentClient {
    async fn generate(&self, script: &str) -> ProviderResult<ContentMetadata> {
        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: metadata_prompt(script),
            }],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let response: ChatResponse = ensure_success(response).await?.json().await?;

        let text = response
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ProviderError::malformed("chat response has no choices"))?;

        let metadata: ContentMetadata =
            serde_json::from_str(extract_json_block(text)).map_err(|e| {
                ProviderError::malformed(format!("chat metadata is not valid JSON: {e}"))
            })?;

        debug!(title = %metadata.title, tags = metadata.tags.len(), "Generated content metadata");
        Ok(metadata)
    }
}
