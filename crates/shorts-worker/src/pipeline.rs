//! The fixed stage sequence.
//!
//! Each checkpoint is written to the store before its stage runs, so the
//! last recorded step/progress always reflects the step that was entered.

use std::path::{Path, PathBuf};

use tracing::info;

use shorts_media::write_srt;
use shorts_models::{Job, Video};
use shorts_store::Store;

use crate::error::{Stage, StageFailure, WorkerResult};
use crate::stages::Stages;

/// Everything the successful pipeline hands back for the terminal update.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub video_path: PathBuf,
    pub thumbnail_path: Option<PathBuf>,
    pub duration_secs: Option<u32>,
}

/// Characters of the script used to seed the video generation prompt.
const PROMPT_SCRIPT_CHARS: usize = 100;

/// Derive the video generation prompt from the script.
pub(crate) fn video_prompt(script: &str) -> String {
    let excerpt: String = script.chars().take(PROMPT_SCRIPT_CHARS).collect();
    format!("High quality cinematic video: {excerpt}")
}

/// Run the stage sequence for one job.
///
/// Checkpoints and metadata writes go straight to the store; stage errors
/// surface as [`StageFailure`] (wrapped in [`crate::WorkerError::Stage`])
/// for the runner's single catch boundary, while store errors propagate
/// unchanged.
pub(crate) async fn run_stages(
    store: &Store,
    stages: &Stages,
    job: &Job,
    video: &Video,
    output_dir: &Path,
) -> WorkerResult<PipelineOutput> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| StageFailure::new(Stage::ContentMetadata, e))?;

    // Stage 1: content metadata
    store
        .checkpoint_job(&job.id, "Generating content metadata", 10)
        .await?;
    let metadata = stages
        .content
        .generate(&video.script)
        .await
        .map_err(|e| StageFailure::new(Stage::ContentMetadata, e))?;
    store
        .set_video_metadata(
            &video.id,
            &metadata.title,
            &metadata.description,
            &metadata.tags,
        )
        .await?;
    info!(video_id = %video.id, title = %metadata.title, "Content metadata generated");

    // Stage 2: voiceover
    store
        .checkpoint_job(&job.id, "Generating voiceover", 25)
        .await?;
    let audio_path = stages
        .speech
        .synthesize(&video.script, &output_dir.join("audio.mp3"))
        .await
        .map_err(|e| StageFailure::new(Stage::Voiceover, e))?;

    // Stage 3: video synthesis (keyed off the script, not the audio)
    store
        .checkpoint_job(&job.id, "Generating video", 40)
        .await?;
    let raw_video_path = stages
        .video
        .generate(&video_prompt(&video.script), &output_dir.join("video_raw.mp4"))
        .await
        .map_err(|e| StageFailure::new(Stage::VideoSynthesis, e))?;

    // Stage 4: captions from the voiceover
    store
        .checkpoint_job(&job.id, "Generating captions", 70)
        .await?;
    let transcript = stages
        .transcription
        .transcribe(&audio_path)
        .await
        .map_err(|e| StageFailure::new(Stage::Captions, e))?;
    let captions_path = output_dir.join("captions.srt");
    write_srt(&transcript.words, &captions_path)
        .await
        .map_err(|e| StageFailure::new(Stage::Captions, e))?;

    // Stage 5: assembly
    store
        .checkpoint_job(&job.id, "Assembling final video", 85)
        .await?;
    let assembly = stages
        .assembler
        .assemble(
            &raw_video_path,
            &audio_path,
            Some(captions_path.as_path()),
            output_dir,
        )
        .await
        .map_err(|e| StageFailure::new(Stage::Assembly, e))?;

    Ok(PipelineOutput {
        video_path: assembly.video_path,
        thumbnail_path: assembly.thumbnail_path,
        duration_secs: assembly.duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_truncates_long_scripts_on_char_boundaries() {
        let script = "é".repeat(300);
        let prompt = video_prompt(&script);
        assert!(prompt.starts_with("High quality cinematic video: "));
        assert_eq!(prompt.chars().count(), 30 + PROMPT_SCRIPT_CHARS);
    }

    #[test]
    fn short_scripts_are_used_whole() {
        assert_eq!(
            video_prompt("Honey never spoils."),
            "High quality cinematic video: Honey never spoils."
        );
    }
}
