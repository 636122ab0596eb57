//! Application execution logic.
//!
//! This module wires the arbitrator and watchers together and runs
//! until a shutdown signal arrives.

use std::sync::Arc;

use thiserror::Error;

use suspend_gate::arbiter::{
    EngineControl, SuspendArbitrator, SuspendReporter, SuspendTransition,
};
use suspend_gate::config::Settings;
use suspend_gate::network::platform::PlatformFetcher;
use suspend_gate::watcher::{
    IdleWatcher, PollingNetworkEvents, PowerEvent, SmartSuspendWatcher, UnavailablePowerProbe,
    events,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to wait for the shutdown signal.
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[from] std::io::Error),
}

/// Engine sink of the standalone daemon.
///
/// The real packet-forwarding engine lives in the host process; the
/// daemon logs the signal at the point where a host would forward it.
#[derive(Debug, Clone, Copy, Default)]
struct LoggingEngine;

impl EngineControl for LoggingEngine {
    fn suspended(&self, suspended: bool) {
        tracing::info!(suspended, "engine suspend signal");
    }
}

/// Builds the arbitrator with the daemon's logging engine and a
/// reason-logging observer.
fn build_arbitrator() -> Arc<SuspendArbitrator<LoggingEngine>> {
    Arc::new(
        SuspendArbitrator::new(LoggingEngine).with_observer(|t: &SuspendTransition| {
            match t.reason {
                Some(reason) => {
                    tracing::info!(%reason, suspended = t.suspended, "suspend reason changed");
                }
                None => tracing::info!(suspended = t.suspended, "suspend reason cleared"),
            }
        }),
    )
}

/// Executes the main application loop.
///
/// This function:
/// 1. Creates the arbitrator over the logging engine
/// 2. Installs the smart suspend watcher on a polling event source
/// 3. Installs the idle watcher on the host power-event channel
/// 4. Waits for the shutdown signal (Ctrl+C), then tears down in
///    reverse order and clears the arbitrator
///
/// # Errors
///
/// Returns an error if listening for the shutdown signal fails.
pub async fn execute(settings: Settings) -> Result<(), RunError> {
    let arbitrator = build_arbitrator();
    let reporter: Arc<dyn SuspendReporter> = arbitrator.clone();

    let mut smart = SmartSuspendWatcher::new(PlatformFetcher::new(), Arc::clone(&reporter));
    smart.install(PollingNetworkEvents::new(
        PlatformFetcher::new(),
        settings.poll_interval,
    ));
    smart.update_config(settings.smart_suspend_enabled, &settings.rules);
    tracing::info!(
        enabled = settings.smart_suspend_enabled,
        poll_interval_secs = settings.poll_interval.as_secs(),
        "smart suspend watcher installed"
    );

    // No portable power service exists; hosts embedding the library
    // push screen/idle broadcasts through this channel. The probe's
    // safe defaults keep the doze source resumed until they do.
    let (power_sender, power_subscription) = events::channel::<PowerEvent>();
    let mut idle = IdleWatcher::new(Arc::new(UnavailablePowerProbe), Arc::clone(&reporter));
    idle.install(power_subscription);
    idle.update_suspend_enabled(settings.doze_enabled);
    if settings.doze_enabled {
        tracing::info!("doze watcher installed; waiting for host power events");
    }

    tracing::info!("suspend-gate running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    drop(power_sender);
    idle.uninstall();
    smart.uninstall();
    arbitrator.clear();
    tracing::info!("suspend-gate stopped");

    Ok(())
}
