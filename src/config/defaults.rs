//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the
//! codebase.

use std::time::Duration;

/// Default link polling interval in seconds.
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Default link polling interval as Duration.
#[must_use]
pub const fn poll_interval() -> Duration {
    Duration::from_secs(POLL_INTERVAL_SECS)
}
