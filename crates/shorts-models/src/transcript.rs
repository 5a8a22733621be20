//! Word-level transcripts produced by the caption stage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single transcribed word with its time span in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptWord {
    /// The word text
    pub word: String,
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
}

/// A word-level transcript of an audio file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    /// Words in spoken order
    pub words: Vec<TranscriptWord>,
}

impl Transcript {
    /// Total spoken duration, from the first word start to the last word end.
    pub fn duration(&self) -> f64 {
        match (self.words.first(), self.words.last()) {
            (Some(first), Some(last)) => (last.end - first.start).max(0.0),
            _ => 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
