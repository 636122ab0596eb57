//! The suspend arbitrator.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::time::{Clock, SystemClock};

use super::source::SuspendSource;
use super::transition::{EngineControl, SuspendReporter, SuspendTransition, TransitionObserver};

/// Shared mutable arbitration state, guarded by one mutex.
#[derive(Debug, Default)]
struct ArbiterState {
    /// Per-source requests; absent entries mean `false`.
    requests: HashMap<SuspendSource, bool>,
    /// Last-emitted merged decision.
    suspended: bool,
    /// Source driving the last-emitted decision, if any.
    reason: Option<SuspendSource>,
}

impl ArbiterState {
    /// The highest-priority source currently requesting suspend.
    fn dominant(&self) -> Option<SuspendSource> {
        SuspendSource::by_priority().find(|source| self.requests.get(source) == Some(&true))
    }
}

/// Merges per-source suspend requests into the one engine decision.
///
/// This is the single source of truth for "is the engine suspended".
/// Sources report through [`SuspendReporter`]; the arbitrator resolves
/// them by descending priority and:
///
/// - signals the engine exactly when the merged boolean changes;
/// - notifies the observer when the merged boolean **or** the active
///   reason changes, so a UI can track which rule is driving an
///   ongoing suspension without the engine being re-signaled.
///
/// # Concurrency
///
/// All mutating entry points serialize on an internal mutex, including
/// the changed-state comparison and the resulting callbacks. Engine and
/// observer callbacks therefore run under the lock and must not call
/// back into the arbitrator.
///
/// # Type Parameters
///
/// * `E` - The [`EngineControl`] receiving the suspend signal
/// * `C` - The [`Clock`] stamping transitions (defaults to
///   [`SystemClock`])
pub struct SuspendArbitrator<E, C = SystemClock> {
    engine: E,
    clock: C,
    observer: Option<Box<dyn TransitionObserver>>,
    state: Mutex<ArbiterState>,
}

impl<E: EngineControl> SuspendArbitrator<E> {
    /// Creates an arbitrator over the given engine, initially not
    /// suspended and with no recorded requests.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self::with_clock(engine, SystemClock)
    }
}

impl<E: EngineControl, C: Clock> SuspendArbitrator<E, C> {
    /// Creates an arbitrator with a custom clock for transition
    /// timestamps.
    #[must_use]
    pub fn with_clock(engine: E, clock: C) -> Self {
        Self {
            engine,
            clock,
            observer: None,
            state: Mutex::new(ArbiterState::default()),
        }
    }

    /// Attaches the transition observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl TransitionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Records `should_suspend` for `source` and re-arbitrates.
    ///
    /// Emits the engine signal and observer notification per the rules
    /// in the type-level docs. Reporting an unchanged value for a
    /// source that does not move the merged state is a no-op.
    pub fn update_suspend(&self, source: SuspendSource, should_suspend: bool) {
        let mut state = self.lock();
        tracing::debug!(%source, should_suspend, "suspend report");

        state.requests.insert(source, should_suspend);

        let reason = state.dominant();
        let suspended = reason.is_some();

        let boolean_changed = suspended != state.suspended;
        let reason_changed = reason != state.reason;
        if !boolean_changed && !reason_changed {
            return;
        }

        state.suspended = suspended;
        state.reason = reason;
        self.emit(suspended, reason, boolean_changed);
    }

    /// Resets all per-source records.
    ///
    /// If the merged state was `true`, forces the transition to
    /// not-suspended with reason `None`, signaling the engine and the
    /// observer exactly like a regular transition.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.requests.clear();

        if !state.suspended {
            return;
        }

        state.suspended = false;
        state.reason = None;
        self.emit(false, None, true);
    }

    /// Returns the source driving the current suspension, or `None`
    /// when not suspended.
    #[must_use]
    pub fn reason(&self) -> Option<SuspendSource> {
        self.lock().reason
    }

    /// Returns the last-emitted merged decision.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.lock().suspended
    }

    /// Signals collaborators about a committed transition. Caller
    /// holds the state lock.
    fn emit(&self, suspended: bool, reason: Option<SuspendSource>, boolean_changed: bool) {
        if boolean_changed {
            self.engine.suspended(suspended);
        }

        if let Some(observer) = &self.observer {
            observer.on_transition(&SuspendTransition {
                suspended,
                reason,
                timestamp: self.clock.now(),
            });
        }

        tracing::info!(suspended, ?reason, "suspend state changed");
    }

    /// Arbitration must keep working even if a callback panicked while
    /// holding the lock, so poisoning is recovered rather than
    /// propagated.
    fn lock(&self) -> MutexGuard<'_, ArbiterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: EngineControl, C: Clock> SuspendReporter for SuspendArbitrator<E, C> {
    fn update_suspend(&self, source: SuspendSource, should_suspend: bool) {
        Self::update_suspend(self, source, should_suspend);
    }
}

impl<E, C> std::fmt::Debug for SuspendArbitrator<E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("SuspendArbitrator")
            .field("suspended", &state.suspended)
            .field("reason", &state.reason)
            .field("sources", &state.requests.len())
            .finish_non_exhaustive()
    }
}
