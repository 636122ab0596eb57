//! Time source abstraction.
//!
//! Suspend transitions carry the wall-clock time at which they were
//! decided. The [`Clock`] trait lets tests stamp transitions with a
//! controlled time instead of [`SystemTime::now()`].

use std::time::SystemTime;

/// Source of wall-clock timestamps for suspend transitions.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Production clock backed by [`SystemTime::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
