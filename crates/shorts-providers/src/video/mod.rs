//! Video generation providers.
//!
//! Both providers follow the same protocol: submit a generation task, poll
//! its status on a fixed interval up to a bounded number of attempts, then
//! download the finished clip. Exhausting the attempt budget is a
//! [`crate::ProviderError::Timeout`], distinct from a remote failure.

mod luma;
mod runway;

pub use luma::LumaClient;
pub use runway::RunwayClient;

use std::time::Duration;

/// Default polling interval between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default polling attempt budget (10 minutes at the default interval).
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;
