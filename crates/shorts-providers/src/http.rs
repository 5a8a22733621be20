//! Shared HTTP helpers for provider clients.

use std::path::Path;

use reqwest::{Client, Response};

use crate::error::{ProviderError, ProviderResult};

/// Turn a non-2xx response into an API error carrying the body text.
pub(crate) async fn ensure_success(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        message
    };

    Err(ProviderError::api(status.as_u16(), message))
}

/// Download a URL to a file, creating parent directories as needed.
pub(crate) async fn download_to_file(
    client: &Client,
    url: &str,
    output: &Path,
) -> ProviderResult<()> {
    let response = ensure_success(client.get(url).send().await?).await?;
    let bytes = response.bytes().await?;

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, &bytes).await?;
    Ok(())
}
