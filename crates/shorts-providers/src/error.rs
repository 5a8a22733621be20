//! Provider error types.

use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Missing credential for {0}")]
    MissingCredential(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Remote generation failed: {0}")]
    RemoteFailed(String),

    #[error("Video generation timed out after {attempts} polling attempts")]
    Timeout { attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn missing_credential(service: impl Into<String>) -> Self {
        Self::MissingCredential(service.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn remote_failed(msg: impl Into<String>) -> Self {
        Self::RemoteFailed(msg.into())
    }

    /// True for the polling-deadline error, which callers may want to
    /// distinguish from ordinary provider failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }

    /// True when the failure is a configuration problem rather than a
    /// remote one.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::MissingCredential(_))
    }
}
