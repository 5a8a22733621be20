//! Application services.

pub mod submission;

pub use submission::{submit_video, Submission};
