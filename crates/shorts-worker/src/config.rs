//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use shorts_providers::ProviderSettings;

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Idle sleep between queue polls when no job is pending
    pub poll_interval: Duration,
    /// Root directory for per-video artifacts
    pub output_dir: PathBuf,
    /// Polling interval for the video synthesis provider
    pub video_poll_interval: Duration,
    /// Polling attempt budget for the video synthesis provider
    pub video_poll_attempts: u32,
    /// Selected provider per stage
    pub settings: ProviderSettings,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            output_dir: PathBuf::from("output"),
            video_poll_interval: Duration::from_secs(10),
            video_poll_attempts: 60,
            settings: ProviderSettings::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("WORKER_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            ),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
            video_poll_interval: Duration::from_secs(
                std::env::var("VIDEO_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            video_poll_attempts: std::env::var("VIDEO_POLL_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            settings: ProviderSettings::from_env(),
        }
    }
}
