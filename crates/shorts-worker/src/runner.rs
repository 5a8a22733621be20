//! The job runner and its control handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use metrics::counter;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use shorts_models::{Job, JobId, VideoStatus};
use shorts_store::Store;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::pipeline::run_stages;
use crate::stages::{ConfiguredStages, StageSource};

const JOBS_COMPLETED_TOTAL: &str = "shorts_jobs_completed_total";
const JOBS_FAILED_TOTAL: &str = "shorts_jobs_failed_total";

struct RunnerShared {
    running: AtomicBool,
    stopping: AtomicBool,
    current_job: Mutex<Option<JobId>>,
    wake: Notify,
}

/// Cheap clonable handle onto the runner, held by the API layer.
#[derive(Clone)]
pub struct RunnerHandle {
    shared: Arc<RunnerShared>,
}

impl RunnerHandle {
    /// Whether the runner loop is alive.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// The job currently being processed, if any.
    pub fn current_job(&self) -> Option<JobId> {
        self.shared.current_job.lock().expect("runner lock poisoned").clone()
    }

    /// Wake the runner: a new job was submitted.
    pub fn notify_submission(&self) {
        self.shared.wake.notify_one();
    }

    /// Request a cooperative shutdown. The in-flight job, if any, runs to
    /// completion first.
    pub fn shutdown(&self) {
        self.shared.stopping.store(true, Ordering::SeqCst);
        self.shared.wake.notify_waiters();
    }
}

/// Single background worker that drains pending jobs in FIFO order.
///
/// Exactly one job is in `processing` at any time; the loop waits on a
/// submission notification with a fixed fallback interval when the queue
/// is empty.
pub struct JobRunner {
    store: Store,
    config: WorkerConfig,
    stage_source: Arc<dyn StageSource>,
    shared: Arc<RunnerShared>,
}

impl JobRunner {
    /// Create a runner with the production stage source.
    pub fn new(store: Store, config: WorkerConfig) -> Self {
        let stage_source = Arc::new(ConfiguredStages::new(config.clone()));
        Self::with_stage_source(store, config, stage_source)
    }

    /// Create a runner with a custom stage source (used by tests).
    pub fn with_stage_source(
        store: Store,
        config: WorkerConfig,
        stage_source: Arc<dyn StageSource>,
    ) -> Self {
        Self {
            store,
            config,
            stage_source,
            shared: Arc::new(RunnerShared {
                running: AtomicBool::new(false),
                stopping: AtomicBool::new(false),
                current_job: Mutex::new(None),
                wake: Notify::new(),
            }),
        }
    }

    /// Get a control handle for the API layer.
    pub fn handle(&self) -> RunnerHandle {
        RunnerHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Run the poll loop until shutdown is requested.
    pub async fn run(self) {
        self.shared.running.store(true, Ordering::SeqCst);
        info!("Job runner started");

        while !self.shared.stopping.load(Ordering::SeqCst) {
            match self.store.next_pending_job().await {
                Ok(Some(job)) => {
                    *self.shared.current_job.lock().expect("runner lock poisoned") =
                        Some(job.id.clone());

                    if let Err(e) = self.process(&job).await {
                        error!(job_id = %job.id, "Job processing aborted: {}", e);
                    }

                    *self.shared.current_job.lock().expect("runner lock poisoned") = None;
                }
                Ok(None) => {
                    // Idle: wait for a submission, or re-poll after the
                    // fallback interval.
                    tokio::select! {
                        _ = self.shared.wake.notified() => {}
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
                Err(e) => {
                    error!("Polling for pending jobs failed: {}", e);
                    tokio::time::sleep(self.config.poll_interval).await;
                }
            }
        }

        self.shared.running.store(false, Ordering::SeqCst);
        info!("Job runner stopped");
    }

    /// Process a single pending job to a terminal state.
    ///
    /// This is the single catch boundary: any stage or configuration
    /// failure marks both job and video `failed` with the underlying
    /// message. Only store-level errors propagate to the caller.
    pub async fn process(&self, job: &Job) -> WorkerResult<()> {
        info!(job_id = %job.id, video_id = %job.video_id, "Processing job");

        self.store.mark_job_processing(&job.id).await?;

        let video = match self.store.video(&job.video_id).await {
            Ok(video) => video,
            Err(e) if e.is_not_found() => {
                return self.fail(job, &e.to_string(), false).await;
            }
            Err(e) => return Err(e.into()),
        };

        // A video already completed by an earlier job is not reprocessed;
        // the job is closed out as completed.
        if video.status == VideoStatus::Completed {
            warn!(video_id = %video.id, "Video already completed, skipping pipeline");
            self.store.complete_job(&job.id).await?;
            counter!(JOBS_COMPLETED_TOTAL).increment(1);
            return Ok(());
        }

        let stages = match self.stage_source.stages(&self.store).await {
            Ok(stages) => stages,
            Err(WorkerError::Store(e)) => return Err(e.into()),
            Err(e) => return self.fail(job, &e.to_string(), true).await,
        };

        let output_dir = self.config.output_dir.join(format!("video_{}", video.id));

        match run_stages(&self.store, &stages, job, &video, &output_dir).await {
            Ok(output) => {
                self.store
                    .set_video_completed(
                        &video.id,
                        &output.video_path.to_string_lossy(),
                        output
                            .thumbnail_path
                            .as_ref()
                            .map(|p| p.to_string_lossy())
                            .as_deref(),
                        output.duration_secs,
                    )
                    .await?;
                self.store.complete_job(&job.id).await?;

                counter!(JOBS_COMPLETED_TOTAL).increment(1);
                info!(job_id = %job.id, video_id = %video.id, "Job completed");
                Ok(())
            }
            Err(WorkerError::Stage(failure)) => {
                error!(
                    job_id = %job.id,
                    stage = %failure.stage,
                    "Stage failed: {}",
                    failure.message
                );
                self.fail(job, &failure.message, true).await
            }
            Err(other) => Err(other),
        }
    }

    /// Record a terminal failure on the job (and, when it exists, its video).
    async fn fail(&self, job: &Job, message: &str, fail_video: bool) -> WorkerResult<()> {
        self.store.fail_job(&job.id, message).await?;
        if fail_video {
            self.store.set_video_failed(&job.video_id).await?;
        }
        counter!(JOBS_FAILED_TOTAL).increment(1);
        Ok(())
    }
}
