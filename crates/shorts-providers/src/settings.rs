//! Provider selection settings.
//!
//! Which concrete service backs each stage is decided once, from the
//! environment, and threaded into stage construction. Selection is never
//! re-checked per call.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Content metadata provider choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentService {
    #[default]
    Gemini,
    Gpt4,
}

impl ContentService {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gemini" => Some(ContentService::Gemini),
            "gpt4" => Some(ContentService::Gpt4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentService::Gemini => "gemini",
            ContentService::Gpt4 => "gpt4",
        }
    }

    /// Name of the stored credential this service needs.
    pub fn credential_key(&self) -> &'static str {
        match self {
            ContentService::Gemini => "gemini",
            ContentService::Gpt4 => "openai",
        }
    }
}

impl fmt::Display for ContentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Speech synthesis provider choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeechService {
    #[default]
    OpenAi,
    ElevenLabs,
}

impl SpeechService {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "openai" => Some(SpeechService::OpenAi),
            "elevenlabs" => Some(SpeechService::ElevenLabs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechService::OpenAi => "openai",
            SpeechService::ElevenLabs => "elevenlabs",
        }
    }

    pub fn credential_key(&self) -> &'static str {
        match self {
            SpeechService::OpenAi => "openai",
            SpeechService::ElevenLabs => "elevenlabs",
        }
    }
}

impl fmt::Display for SpeechService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Video generation provider choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoService {
    #[default]
    Luma,
    Runway,
}

impl VideoService {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "luma" => Some(VideoService::Luma),
            "runway" => Some(VideoService::Runway),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoService::Luma => "luma",
            VideoService::Runway => "runway",
        }
    }

    pub fn credential_key(&self) -> &'static str {
        match self {
            VideoService::Luma => "luma",
            VideoService::Runway => "runway",
        }
    }
}

impl fmt::Display for VideoService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The selected provider for every configurable stage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub content: ContentService,
    pub speech: SpeechService,
    pub video: VideoService,
}

impl ProviderSettings {
    /// Read selections from the environment, falling back to defaults for
    /// unset or unrecognized values.
    pub fn from_env() -> Self {
        Self {
            content: parse_env("CONTENT_AI_SERVICE", ContentService::parse),
            speech: parse_env("TTS_SERVICE", SpeechService::parse),
            video: parse_env("VIDEO_SERVICE", VideoService::parse),
        }
    }

    /// Credential names the selected providers need, deduplicated.
    /// Transcription always runs on Whisper, so "openai" is always required.
    pub fn required_services(&self) -> Vec<&'static str> {
        let mut services = vec![
            self.content.credential_key(),
            self.speech.credential_key(),
            self.video.credential_key(),
            "openai",
        ];
        services.sort();
        services.dedup();
        services
    }
}

fn parse_env<T: Default>(var: &str, parse: fn(&str) -> Option<T>) -> T {
    match std::env::var(var) {
        Ok(value) => parse(&value.to_lowercase()).unwrap_or_else(|| {
            warn!("Unrecognized {} value {:?}, using default", var, value);
            T::default()
        }),
        Err(_) => T::default(),
    }
}
