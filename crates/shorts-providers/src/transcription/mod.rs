//! Transcription providers.

mod whisper;

pub use whisper::WhisperClient;
