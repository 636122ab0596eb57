//! The screen/idle suspend watcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use crate::arbiter::{SuspendReporter, SuspendSource};

use super::events::{PowerEvent, PowerEvents, PowerStateProbe};

struct Inner {
    probe: Arc<dyn PowerStateProbe>,
    reporter: Arc<dyn SuspendReporter>,
    enabled: AtomicBool,
}

impl Inner {
    fn handle(&self, event: PowerEvent) {
        tracing::trace!(?event, "power event");
        match event {
            // Screen on always overrides idle suspension, regardless
            // of what the probe currently says.
            PowerEvent::ScreenOn => self.report(false),
            PowerEvent::ScreenOff | PowerEvent::IdleModeChanged => self.evaluate(),
        }
    }

    /// Reports the current decision from live probe state.
    fn evaluate(&self) {
        if !self.enabled.load(Ordering::SeqCst) {
            self.report(false);
            return;
        }

        let should_suspend = !self.probe.is_screen_on() && self.probe.is_device_idle();
        self.report(should_suspend);
    }

    fn report(&self, should_suspend: bool) {
        self.reporter
            .update_suspend(SuspendSource::Doze, should_suspend);
    }
}

/// Watches screen and idle-mode changes and reports whether the device
/// is dozing (screen off **and** idle).
///
/// Reports under [`SuspendSource::Doze`], the low-priority source, so
/// an active smart-suspend match always wins the reason.
///
/// The watcher starts disabled;
/// [`update_suspend_enabled`](Self::update_suspend_enabled) turns the
/// feature on or off and re-evaluates immediately either way.
pub struct IdleWatcher {
    inner: Arc<Inner>,
    events_task: Option<JoinHandle<()>>,
}

impl IdleWatcher {
    /// Creates an uninstalled, disabled watcher.
    ///
    /// # Arguments
    ///
    /// * `probe` - Queryable screen/idle state
    /// * `reporter` - The arbitrator handle to report decisions to
    #[must_use]
    pub fn new(probe: Arc<dyn PowerStateProbe>, reporter: Arc<dyn SuspendReporter>) -> Self {
        Self {
            inner: Arc::new(Inner {
                probe,
                reporter,
                enabled: AtomicBool::new(false),
            }),
            events_task: None,
        }
    }

    /// Subscribes to the power-event source and immediately reports
    /// the initial state.
    ///
    /// Does nothing if already installed. Must be called within a
    /// tokio runtime.
    pub fn install<P>(&mut self, events: P)
    where
        P: PowerEvents + 'static,
    {
        if self.events_task.is_some() {
            return;
        }

        self.inner.evaluate();

        let inner = Arc::clone(&self.inner);
        self.events_task = Some(tokio::spawn(async move {
            let mut stream = events.into_stream();
            while let Some(event) = stream.next().await {
                inner.handle(event);
            }
        }));
    }

    /// Enables or disables idle suspension and re-evaluates the
    /// current screen/idle state immediately.
    ///
    /// While disabled, the doze source reports `false` no matter what
    /// the screen or idle mode do.
    pub fn update_suspend_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
        self.inner.evaluate();
    }

    /// Returns true if the watcher is currently subscribed.
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        self.events_task.is_some()
    }

    /// Unsubscribes and reports `false` under [`SuspendSource::Doze`],
    /// matching the teardown behavior of every other source.
    ///
    /// No-op when not installed.
    pub fn uninstall(&mut self) {
        let Some(task) = self.events_task.take() else {
            return;
        };

        task.abort();
        self.inner.report(false);
        tracing::debug!("idle watcher uninstalled");
    }
}

impl Drop for IdleWatcher {
    fn drop(&mut self) {
        if let Some(task) = self.events_task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for IdleWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleWatcher")
            .field("installed", &self.events_task.is_some())
            .field("enabled", &self.inner.enabled.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
