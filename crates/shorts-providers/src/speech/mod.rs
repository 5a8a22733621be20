//! Voice synthesis providers.

mod elevenlabs;
mod openai;

pub use elevenlabs::ElevenLabsClient;
pub use openai::OpenAiSpeechClient;
