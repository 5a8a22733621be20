//! Final video assembly.
//!
//! Muxes the generated clip with the voiceover, trims to the shorter of
//! the two (`-shortest`), and burns subtitles in when an SRT file is
//! supplied.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};

/// Subtitle styling applied when burning in captions.
const SUBTITLE_STYLE: &str = "FontName=Arial Bold,FontSize=24,PrimaryColour=&H00FFFFFF,\
OutlineColour=&H00000000,BorderStyle=3,Outline=2,Shadow=1,Alignment=2";

/// Combine video, audio and optional captions into the final short.
pub async fn assemble_video(
    video: &Path,
    audio: &Path,
    captions: Option<&Path>,
    output: &Path,
) -> MediaResult<PathBuf> {
    for input in [video, audio] {
        if !input.exists() {
            return Err(MediaError::FileNotFound(input.to_path_buf()));
        }
    }

    let mut cmd = FfmpegCommand::new(output).input(video).input(audio);

    if let Some(captions) = captions.filter(|c| c.exists()) {
        cmd = cmd.video_filter(subtitles_filter(captions));
    }

    cmd = cmd
        .video_codec("libx264")
        .preset("medium")
        .crf(23)
        .audio_codec("aac")
        .audio_bitrate("192k")
        .audio_sample_rate(44_100)
        .shortest()
        .pixel_format("yuv420p")
        .faststart();

    cmd.run().await?;

    info!(path = %output.display(), "Final video assembled");
    Ok(output.to_path_buf())
}

/// Build the `subtitles` filter expression for an SRT path.
///
/// FFmpeg filter syntax treats `:` and `\` specially inside filter
/// arguments, so the path is normalized and escaped.
fn subtitles_filter(captions: &Path) -> String {
    let escaped = captions
        .to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:");
    format!("subtitles='{escaped}':force_style='{SUBTITLE_STYLE}'")
}
