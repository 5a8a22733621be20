//! YouTube upload client.
//!
//! Uses the Data API v3 resumable upload protocol with an OAuth refresh
//! token obtained out of band (the dashboard's one-time consent flow).
//! Uploads land as private; visibility is changed in YouTube Studio.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use shorts_models::ContentMetadata;

use crate::error::{ProviderError, ProviderResult};
use crate::http::ensure_success;
use crate::traits::UploadProvider;

const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";
/// "People & Blogs"
const CATEGORY_ID: &str = "22";

/// YouTube Data API v3 upload client.
pub struct YouTubeClient {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_url: String,
    upload_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UploadedVideo {
    id: String,
}

impl YouTubeClient {
    /// Create a new client from OAuth credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Override both endpoints (used by tests).
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        upload_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.upload_url = upload_url.into();
        self
    }

    /// Exchange the refresh token for a short-lived access token.
    async fn access_token(&self) -> ProviderResult<String> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;
        let token: TokenResponse = ensure_success(response).await?.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl UploadProvider for YouTubeClient {
    async fn upload(&self, video: &Path, metadata: &ContentMetadata) -> ProviderResult<String> {
        if !video.exists() {
            return Err(ProviderError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("video file not found: {}", video.display()),
            )));
        }

        let access_token = self.access_token().await?;

        let body = json!({
            "snippet": {
                "title": metadata.title,
                "description": metadata.description_with_hashtags(),
                "tags": metadata.tags,
                "categoryId": CATEGORY_ID,
            },
            "status": {
                "privacyStatus": "private",
                "selfDeclaredMadeForKids": false,
            }
        });

        // Step 1: open a resumable upload session.
        let response = self
            .client
            .post(format!(
                "{}?uploadType=resumable&part=snippet,status",
                self.upload_url
            ))
            .bearer_auth(&access_token)
            .header("X-Upload-Content-Type", "video/mp4")
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let session_url = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::malformed("resumable upload session has no location header")
            })?;

        debug!(session = %session_url, "Opened resumable upload session");

        // Step 2: send the media bytes in a single request.
        let bytes = tokio::fs::read(video).await?;
        let response = self
            .client
            .put(&session_url)
            .bearer_auth(&access_token)
            .header("Content-Type", "video/mp4")
            .body(bytes)
            .send()
            .await?;
        let uploaded: UploadedVideo = ensure_success(response).await?.json().await?;

        info!(video_id = %uploaded.id, "Video uploaded (private)");
        Ok(uploaded.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json as j;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn refreshes_token_and_uploads_in_two_steps() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(j!({ "access_token": "ya29.test" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("location", format!("{}/session/abc", server.uri()).as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/session/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(j!({ "id": "yt-video-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("final.mp4");
        std::fs::write(&video, b"mp4-bytes").unwrap();

        let client = YouTubeClient::new("id", "secret", "refresh").with_endpoints(
            format!("{}/token", server.uri()),
            format!("{}/upload", server.uri()),
        );

        let metadata = ContentMetadata {
            title: "Honey Facts".into(),
            description: "Still edible.".into(),
            tags: vec!["honey".into()],
            hashtags: vec!["#shorts".into()],
        };

        let id = client.upload(&video, &metadata).await.unwrap();
        assert_eq!(id, "yt-video-1");
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_request() {
        let client = YouTubeClient::new("id", "secret", "refresh");
        let metadata = ContentMetadata {
            title: "t".into(),
            description: "d".into(),
            tags: vec![],
            hashtags: vec![],
        };

        let err = client
            .upload(Path::new("/nonexistent/final.mp4"), &metadata)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Io(_)));
    }
}
