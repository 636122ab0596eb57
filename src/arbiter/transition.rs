//! Transition events and the seams to downstream collaborators.

use std::time::SystemTime;

use super::SuspendSource;

/// A change in the merged suspend decision or its active reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspendTransition {
    /// The merged suspend decision after this transition.
    pub suspended: bool,
    /// The highest-priority source currently requesting suspend, or
    /// `None` when nothing does.
    pub reason: Option<SuspendSource>,
    /// When the transition was decided.
    pub timestamp: SystemTime,
}

/// The downstream packet-forwarding engine's suspend signal.
///
/// Invoked exactly on merged-boolean transitions, never for
/// reason-only changes.
pub trait EngineControl: Send + Sync {
    /// Tells the engine to suspend (`true`) or resume (`false`)
    /// packet forwarding.
    fn suspended(&self, suspended: bool);
}

/// Observer of suspend transitions, typically a UI/notification
/// surface displaying the active reason.
///
/// Called under the arbitration lock; implementations must be quick
/// and must not call back into the arbitrator.
pub trait TransitionObserver: Send + Sync {
    /// Invoked on every transition of the merged decision or the
    /// active reason.
    fn on_transition(&self, transition: &SuspendTransition);
}

// Closures observe transitions directly.
impl<F> TransitionObserver for F
where
    F: Fn(&SuspendTransition) + Send + Sync,
{
    fn on_transition(&self, transition: &SuspendTransition) {
        self(transition);
    }
}

/// The narrow handle watchers use to report their decision.
///
/// Watchers receive this at construction rather than reaching for a
/// global arbitrator instance.
pub trait SuspendReporter: Send + Sync {
    /// Records `should_suspend` for `source` and re-arbitrates.
    fn update_suspend(&self, source: SuspendSource, should_suspend: bool);
}
