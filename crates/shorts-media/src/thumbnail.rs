//! Thumbnail extraction.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};

/// Offset into the video where the thumbnail frame is taken.
const THUMBNAIL_OFFSET_SECS: f64 = 1.0;

/// Extract a single JPEG frame from a video for use as its thumbnail.
pub async fn extract_thumbnail(video: &Path, output: &Path) -> MediaResult<PathBuf> {
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    FfmpegCommand::new(output)
        .input(video)
        .seek(THUMBNAIL_OFFSET_SECS)
        .single_frame()
        .run()
        .await?;

    debug!(path = %output.display(), "Thumbnail extracted");
    Ok(output.to_path_buf())
}
