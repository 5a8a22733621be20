//! SQLite persistence for the Shorts Studio backend.
//!
//! This crate provides:
//! - A [`Store`] handle over a SQLite pool (videos, jobs, credentials,
//!   schedules)
//! - AES-256-GCM encryption for credential values at rest
//! - Repository methods grouped per entity

pub mod credentials;
pub mod crypto;
pub mod error;
pub mod jobs;
pub mod schedules;
pub mod store;
pub mod videos;

pub use credentials::ConfiguredService;
pub use crypto::SecretCipher;
pub use error::{StoreError, StoreResult};
pub use store::Store;
