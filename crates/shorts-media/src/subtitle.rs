//! SRT subtitle construction from word-level transcripts.
//!
//! Words are grouped into cues of at most [`MAX_WORDS_PER_CUE`] words or
//! [`MAX_CUE_SECS`] seconds, whichever threshold is hit first.

use std::path::Path;

use shorts_models::TranscriptWord;

use crate::error::MediaResult;

/// Maximum words in a single subtitle cue.
pub const MAX_WORDS_PER_CUE: usize = 4;

/// Maximum duration of a single subtitle cue in seconds.
pub const MAX_CUE_SECS: f64 = 3.0;

struct Cue {
    start: f64,
    end: f64,
    text: String,
}

/// Build SRT text from a word-level transcript.
pub fn build_srt(words: &[TranscriptWord]) -> String {
    let mut cues: Vec<Cue> = Vec::new();
    let mut current: Vec<&TranscriptWord> = Vec::new();

    for word in words {
        current.push(word);

        let start = current[0].start;
        let end = word.end;
        if current.len() >= MAX_WORDS_PER_CUE || end - start >= MAX_CUE_SECS {
            cues.push(flush(&current));
            current.clear();
        }
    }

    if !current.is_empty() {
        cues.push(flush(&current));
    }

    let mut srt = String::new();
    for (idx, cue) in cues.iter().enumerate() {
        srt.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            idx + 1,
            format_timestamp(cue.start),
            format_timestamp(cue.end),
            cue.text
        ));
    }
    srt
}

/// Build and write an SRT file next to the other artifacts.
pub async fn write_srt(words: &[TranscriptWord], output: &Path) -> MediaResult<()> {
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, build_srt(words)).await?;
    Ok(())
}

fn flush(words: &[&TranscriptWord]) -> Cue {
    let text = words
        .iter()
        .map(|w| w.word.trim())
        .collect::<Vec<_>>()
        .join(" ");
    Cue {
        start: words[0].start,
        end: words[words.len() - 1].end,
        text,
    }
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}
