//! Suspend arbitration layer.
//!
//! This module provides:
//! - Prioritized suspend sources ([`SuspendSource`])
//! - Transition events and collaborator seams ([`SuspendTransition`],
//!   [`EngineControl`], [`TransitionObserver`], [`SuspendReporter`])
//! - The arbitrator itself ([`SuspendArbitrator`])
//!
//! Watchers report per-source booleans through [`SuspendReporter`];
//! the arbitrator merges them by priority into the single engine
//! suspend signal and notifies an observer on every transition.

mod arbitrator;
mod source;
mod transition;

pub use arbitrator::SuspendArbitrator;
pub use source::SuspendSource;
pub use transition::{EngineControl, SuspendReporter, SuspendTransition, TransitionObserver};
