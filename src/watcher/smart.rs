//! The network-rule suspend watcher.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use crate::arbiter::{SuspendReporter, SuspendSource};
use crate::network::{AddressFetcher, observed_addresses};
use crate::rules::{RuleSet, matches};

use super::debounce::Debouncer;
use super::events::NetworkEvents;

/// Current user configuration of the watcher.
///
/// The deferred check re-reads this under the lock at fire time, so a
/// reconfiguration racing a pending check is resolved by whichever
/// settles the lock last.
#[derive(Debug, Default)]
struct SmartConfig {
    enabled: bool,
    rules: RuleSet,
}

/// State shared between the watcher handle, its event task, and the
/// deferred check.
struct Inner<F> {
    fetcher: F,
    reporter: Arc<dyn SuspendReporter>,
    config: Mutex<SmartConfig>,
    debouncer: Debouncer,
}

impl<F: AddressFetcher + 'static> Inner<F> {
    fn schedule_check(inner: &Arc<Self>) {
        let owned = Arc::clone(inner);
        inner.debouncer.trigger(async move {
            owned.check();
        });
    }

    /// The debounced check: evaluate the current addresses against the
    /// current rules and report the outcome.
    fn check(&self) {
        let (enabled, rules) = {
            let config = self.config_slot();
            (config.enabled, config.rules.clone())
        };

        if !enabled || rules.is_empty() {
            self.report(false);
            return;
        }

        let addresses = match self.fetcher.fetch() {
            Ok(links) => observed_addresses(&links),
            Err(error) => {
                // No evidence must never suspend the engine.
                tracing::warn!("link enumeration failed: {error}");
                HashSet::new()
            }
        };

        let matched = matches(&addresses, &rules);
        tracing::debug!(matched, observed = addresses.len(), "smart suspend check");
        self.report(matched);
    }

    fn report(&self, should_suspend: bool) {
        self.reporter
            .update_suspend(SuspendSource::SmartSuspend, should_suspend);
    }

    fn config_slot(&self) -> MutexGuard<'_, SmartConfig> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Watches connectivity changes and reports whether the device's
/// current addresses match the user's IP rules.
///
/// Every subscribed network event (and every reconfiguration)
/// schedules a debounced re-check; the check enumerates all links
/// fresh, evaluates the [`RuleSet`], and reports the boolean to the
/// arbitrator under [`SuspendSource::SmartSuspend`].
///
/// # Lifecycle
///
/// [`install`](Self::install) subscribes, [`uninstall`](Self::uninstall)
/// unsubscribes, cancels any pending check, and reports `false` so the
/// source cannot hold a stale suspend request after teardown. Both are
/// idempotent.
///
/// # Type Parameters
///
/// * `F` - The [`AddressFetcher`] used by each check
pub struct SmartSuspendWatcher<F> {
    inner: Arc<Inner<F>>,
    events_task: Option<JoinHandle<()>>,
}

impl<F: AddressFetcher + 'static> SmartSuspendWatcher<F> {
    /// Creates an uninstalled watcher, disabled and with no rules.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The address fetcher used by each check
    /// * `reporter` - The arbitrator handle to report decisions to
    #[must_use]
    pub fn new(fetcher: F, reporter: Arc<dyn SuspendReporter>) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                reporter,
                config: Mutex::new(SmartConfig::default()),
                debouncer: Debouncer::default(),
            }),
            events_task: None,
        }
    }

    /// Subscribes to the given network-event source.
    ///
    /// Does nothing if already installed. Must be called within a
    /// tokio runtime.
    pub fn install<N>(&mut self, events: N)
    where
        N: NetworkEvents + 'static,
    {
        if self.events_task.is_some() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        self.events_task = Some(tokio::spawn(async move {
            let mut stream = events.into_stream();
            while let Some(event) = stream.next().await {
                tracing::trace!(?event, "network event");
                Inner::schedule_check(&inner);
            }
        }));
    }

    /// Replaces the enabled flag and rule set, then schedules a check.
    ///
    /// Reconfiguration always re-evaluates, even if no network event
    /// occurred.
    pub fn update_config(&self, enabled: bool, raw_rules: &str) {
        let rules = RuleSet::parse(raw_rules);
        tracing::debug!(enabled, rule_count = rules.len(), "smart suspend reconfigured");

        {
            let mut config = self.inner.config_slot();
            config.enabled = enabled;
            config.rules = rules;
        }

        Inner::schedule_check(&self.inner);
    }

    /// Returns true if the watcher is currently subscribed.
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        self.events_task.is_some()
    }

    /// Unsubscribes, cancels any pending check, and reports `false`
    /// under [`SuspendSource::SmartSuspend`].
    ///
    /// No-op when not installed.
    pub fn uninstall(&mut self) {
        let Some(task) = self.events_task.take() else {
            return;
        };

        task.abort();
        self.inner.debouncer.cancel();
        self.inner.report(false);
        tracing::debug!("smart suspend watcher uninstalled");
    }
}

impl<F> Drop for SmartSuspendWatcher<F> {
    fn drop(&mut self) {
        // The event task must not outlive its watcher; the debouncer
        // cancels itself on drop. An orderly teardown that also
        // reports false is uninstall's job.
        if let Some(task) = self.events_task.take() {
            task.abort();
        }
    }
}

impl<F> std::fmt::Debug for SmartSuspendWatcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartSuspendWatcher")
            .field("installed", &self.events_task.is_some())
            .finish_non_exhaustive()
    }
}
