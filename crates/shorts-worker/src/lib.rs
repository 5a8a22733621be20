//! Background job runner for the Shorts Studio backend.
//!
//! The runner owns a single poll loop that drains pending jobs in FIFO
//! order and drives each one through the fixed stage sequence:
//! content metadata, voiceover, video synthesis, captions, assembly.
//! Progress is checkpointed to the store before every stage so a crash
//! leaves the job's last recorded step consistent with what was entered.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod stages;

pub use config::WorkerConfig;
pub use error::{Stage, StageFailure, WorkerError, WorkerResult};
pub use pipeline::PipelineOutput;
pub use runner::{JobRunner, RunnerHandle};
pub use stages::{
    Assembler, AssemblyOutput, ConfiguredStages, FfmpegAssembler, StageSource, Stages,
};
