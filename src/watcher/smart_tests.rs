//! Behavioral tests for `SmartSuspendWatcher`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;

use crate::arbiter::{
    EngineControl, SuspendArbitrator, SuspendReporter, SuspendSource, SuspendTransition,
};
use crate::network::{AddressFetcher, FetchError, LinkAddress, LinkSnapshot};
use crate::watcher::events::{self, NetworkEvent, NetworkId};
use crate::watcher::smart::SmartSuspendWatcher;

/// Records every report a watcher makes.
#[derive(Default)]
struct RecordingReporter {
    reports: Mutex<Vec<(SuspendSource, bool)>>,
}

impl RecordingReporter {
    fn reports(&self) -> Vec<(SuspendSource, bool)> {
        self.reports.lock().unwrap().clone()
    }

    fn last(&self) -> Option<(SuspendSource, bool)> {
        self.reports.lock().unwrap().last().copied()
    }
}

impl SuspendReporter for RecordingReporter {
    fn update_suspend(&self, source: SuspendSource, should_suspend: bool) {
        self.reports.lock().unwrap().push((source, should_suspend));
    }
}

/// Fetcher whose current addresses the test can swap at any time.
#[derive(Default)]
struct SharedFetcher {
    links: Mutex<Vec<LinkSnapshot>>,
}

impl SharedFetcher {
    fn with_addresses(addresses: &[&str]) -> Arc<Self> {
        let fetcher = Arc::new(Self::default());
        fetcher.set_addresses(addresses);
        fetcher
    }

    fn set_addresses(&self, addresses: &[&str]) {
        let links = vec![LinkSnapshot::new(
            "eth0",
            addresses
                .iter()
                .map(|a| LinkAddress::new(a.parse().unwrap()))
                .collect(),
        )];
        *self.links.lock().unwrap() = links;
    }
}

impl AddressFetcher for SharedFetcher {
    fn fetch(&self) -> Result<Vec<LinkSnapshot>, FetchError> {
        Ok(self.links.lock().unwrap().clone())
    }
}

struct FailingFetcher;

impl AddressFetcher for FailingFetcher {
    fn fetch(&self) -> Result<Vec<LinkSnapshot>, FetchError> {
        Err(FetchError::Platform {
            message: "no permission".to_string(),
        })
    }
}

/// Waits out the debounce window plus slack.
async fn settle() {
    sleep(Duration::from_millis(600)).await;
}

#[tokio::test(start_paused = true)]
async fn reconfiguration_checks_without_a_network_event() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());

    watcher.update_config(true, "192.168.0.0/16");
    settle().await;

    assert_eq!(
        reporter.reports(),
        vec![(SuspendSource::SmartSuspend, true)]
    );
}

#[tokio::test(start_paused = true)]
async fn disabled_watcher_reports_false() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());

    watcher.update_config(false, "192.168.0.0/16");
    settle().await;

    assert_eq!(
        reporter.last(),
        Some((SuspendSource::SmartSuspend, false))
    );
}

#[tokio::test(start_paused = true)]
async fn empty_rules_report_false() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());

    watcher.update_config(true, "   ");
    settle().await;

    assert_eq!(
        reporter.last(),
        Some((SuspendSource::SmartSuspend, false))
    );
}

#[tokio::test(start_paused = true)]
async fn non_matching_addresses_report_false() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["8.8.8.8"]);
    let watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());

    watcher.update_config(true, "192.168.0.0/16");
    settle().await;

    assert_eq!(
        reporter.last(),
        Some((SuspendSource::SmartSuspend, false))
    );
}

#[tokio::test(start_paused = true)]
async fn network_event_triggers_a_recheck() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let (sender, subscription) = events::channel::<NetworkEvent>();

    let mut watcher = SmartSuspendWatcher::new(Arc::clone(&fetcher), reporter.clone());
    watcher.install(subscription);
    watcher.update_config(true, "192.168.0.0/16");
    settle().await;
    assert_eq!(reporter.last(), Some((SuspendSource::SmartSuspend, true)));

    // The device moves to a non-matching network.
    fetcher.set_addresses(&["8.8.8.8"]);
    sender.send(NetworkEvent::LinkPropertiesChanged(NetworkId::new(1)));
    settle().await;

    assert_eq!(
        reporter.last(),
        Some((SuspendSource::SmartSuspend, false))
    );
}

#[tokio::test(start_paused = true)]
async fn event_burst_coalesces_into_one_check() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let (sender, subscription) = events::channel::<NetworkEvent>();

    let mut watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());
    watcher.install(subscription);
    watcher.update_config(true, "192.168.0.0/16");
    settle().await;
    let baseline = reporter.reports().len();

    for _ in 0..5 {
        sender.send(NetworkEvent::CapabilitiesChanged(NetworkId::new(1)));
        sleep(Duration::from_millis(50)).await;
    }
    settle().await;

    assert_eq!(reporter.reports().len(), baseline + 1);
}

#[tokio::test(start_paused = true)]
async fn uninstall_cancels_pending_check_and_reports_false() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let (sender, subscription) = events::channel::<NetworkEvent>();

    let mut watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());
    watcher.install(subscription);
    assert!(watcher.is_installed());

    // A check is pending when teardown happens; it must never fire.
    watcher.update_config(true, "192.168.0.0/16");
    watcher.uninstall();
    assert!(!watcher.is_installed());

    sleep(Duration::from_secs(2)).await;

    assert_eq!(
        reporter.reports(),
        vec![(SuspendSource::SmartSuspend, false)]
    );

    // Late platform events after teardown go nowhere.
    assert!(!sender.send(NetworkEvent::Lost(NetworkId::new(1))));
}

#[tokio::test(start_paused = true)]
async fn uninstall_when_not_installed_is_a_noop() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&[]);
    let mut watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());

    watcher.uninstall();

    assert!(reporter.reports().is_empty());
}

#[tokio::test(start_paused = true)]
async fn install_is_idempotent() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let (sender, first) = events::channel::<NetworkEvent>();
    let (_ignored, second) = events::channel::<NetworkEvent>();

    let mut watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());
    watcher.install(first);
    watcher.install(second);
    watcher.update_config(true, "192.168.0.0/16");
    settle().await;

    // The first subscription is still the live one.
    let baseline = reporter.reports().len();
    sender.send(NetworkEvent::Available(NetworkId::new(1)));
    settle().await;

    assert_eq!(reporter.reports().len(), baseline + 1);
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_reports_false() {
    let reporter = Arc::new(RecordingReporter::default());
    let watcher = SmartSuspendWatcher::new(FailingFetcher, reporter.clone());

    watcher.update_config(true, "0.0.0.0/0");
    settle().await;

    assert_eq!(
        reporter.last(),
        Some((SuspendSource::SmartSuspend, false))
    );
}

#[tokio::test(start_paused = true)]
async fn loopback_addresses_never_match() {
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = SharedFetcher::with_addresses(&["127.0.0.1"]);
    let watcher = SmartSuspendWatcher::new(fetcher, reporter.clone());

    watcher.update_config(true, "127.0.0.1");
    settle().await;

    assert_eq!(
        reporter.last(),
        Some((SuspendSource::SmartSuspend, false))
    );
}

// Full-stack scenarios through a real arbitrator.

#[derive(Default)]
struct RecordingEngine {
    calls: Mutex<Vec<bool>>,
}

impl EngineControl for Arc<RecordingEngine> {
    fn suspended(&self, suspended: bool) {
        self.calls.lock().unwrap().push(suspended);
    }
}

#[tokio::test(start_paused = true)]
async fn address_match_suspends_the_engine_and_release_resumes() {
    let engine = Arc::new(RecordingEngine::default());
    let arbitrator = Arc::new(SuspendArbitrator::new(Arc::clone(&engine)));
    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let (sender, subscription) = events::channel::<NetworkEvent>();

    let mut watcher = SmartSuspendWatcher::new(
        Arc::clone(&fetcher),
        arbitrator.clone(),
    );
    watcher.install(subscription);
    watcher.update_config(true, "192.168.0.0/16");
    settle().await;

    assert!(arbitrator.is_suspended());
    assert_eq!(arbitrator.reason(), Some(SuspendSource::SmartSuspend));

    fetcher.set_addresses(&["8.8.8.8"]);
    sender.send(NetworkEvent::LinkPropertiesChanged(NetworkId::new(1)));
    settle().await;

    assert!(!arbitrator.is_suspended());
    assert_eq!(arbitrator.reason(), None);
    assert_eq!(*engine.calls.lock().unwrap(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn smart_suspend_takes_over_the_reason_from_doze() {
    let engine = Arc::new(RecordingEngine::default());
    let transitions: Arc<Mutex<Vec<SuspendTransition>>> = Arc::default();
    let seen = Arc::clone(&transitions);

    let arbitrator = Arc::new(
        SuspendArbitrator::new(Arc::clone(&engine))
            .with_observer(move |t: &SuspendTransition| seen.lock().unwrap().push(*t)),
    );

    // Doze is already suspending when the address starts matching.
    arbitrator.update_suspend(SuspendSource::Doze, true);

    let fetcher = SharedFetcher::with_addresses(&["192.168.5.5"]);
    let watcher = SmartSuspendWatcher::new(
        fetcher,
        arbitrator.clone(),
    );
    watcher.update_config(true, "192.168.0.0/16");
    settle().await;

    // Boolean unchanged, reason handed over, engine signaled once.
    assert!(arbitrator.is_suspended());
    assert_eq!(arbitrator.reason(), Some(SuspendSource::SmartSuspend));
    assert_eq!(*engine.calls.lock().unwrap(), vec![true]);

    let reasons: Vec<_> = transitions.lock().unwrap().iter().map(|t| t.reason).collect();
    assert_eq!(
        reasons,
        vec![Some(SuspendSource::Doze), Some(SuspendSource::SmartSuspend)]
    );
}
