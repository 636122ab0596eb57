//! Delay-coalescing of bursty triggers.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delay between the last trigger and the action execution.
///
/// Network callbacks arrive in bursts when a link flaps or
/// renegotiates; half a second of quiet collapses such a burst into a
/// single address check without making the reaction feel delayed.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Collapses bursts of triggers into one deferred action.
///
/// [`trigger`](Self::trigger) schedules the given action to run once
/// after the configured delay, measured from the *last* trigger; a
/// newer trigger aborts the previously scheduled action. Under a burst
/// arriving faster than the delay, exactly one action runs: the one
/// captured by the final trigger.
///
/// At most one action is ever pending per instance. The action runs on
/// the tokio timer, not on the triggering thread, so the future must
/// be self-contained (`Send + 'static`). Dropping the debouncer
/// cancels whatever is pending.
///
/// Requires a running tokio runtime at trigger time.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Creates a debouncer with a custom delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedules `action` to run once after the delay, replacing (and
    /// aborting) any previously scheduled action.
    pub fn trigger<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });

        if let Some(previous) = self.pending_slot().replace(handle) {
            previous.abort();
        }
    }

    /// Discards a pending action without running it. Idempotent when
    /// nothing is pending.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending_slot().take() {
            pending.abort();
        }
    }

    /// Returns true if an action is scheduled and has not yet run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending_slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Returns the configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    fn pending_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
