//! Polling network-event source.
//!
//! Platforms without push notifications get connectivity events
//! synthesized here: link snapshots are fetched on an interval and a
//! [`NetworkEvent::LinkPropertiesChanged`] is emitted whenever two
//! successive snapshots differ. The first successful fetch emits
//! [`NetworkEvent::Available`], mirroring platforms that announce
//! already-connected links on subscription.

use std::pin::Pin;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use tokio::time::{Interval, interval};
use tokio_stream::Stream;

use crate::network::{AddressFetcher, LinkSnapshot};

use super::events::{NetworkEvent, NetworkEvents, NetworkId};

/// Network-event source backed by periodic snapshot comparison.
///
/// # Type Parameters
///
/// * `F` - The [`AddressFetcher`] used for each poll
#[derive(Debug)]
pub struct PollingNetworkEvents<F> {
    fetcher: F,
    interval: Duration,
}

impl<F> PollingNetworkEvents<F> {
    /// Creates a polling event source.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The address fetcher to poll
    /// * `interval` - The time between polls
    #[must_use]
    pub const fn new(fetcher: F, interval: Duration) -> Self {
        Self { fetcher, interval }
    }

    /// Returns the configured polling interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl<F> NetworkEvents for PollingNetworkEvents<F>
where
    F: AddressFetcher + Unpin + 'static,
{
    type Stream = PollingEventStream<F>;

    fn into_stream(self) -> Self::Stream {
        PollingEventStream {
            fetcher: self.fetcher,
            interval: interval(self.interval),
            previous: None,
        }
    }
}

/// The stream produced by [`PollingNetworkEvents`].
///
/// Never terminates on its own; drop it (or abort the consuming task)
/// to unsubscribe. Fetch failures are logged and skipped, keeping the
/// last good snapshot as the comparison baseline.
#[derive(Debug)]
pub struct PollingEventStream<F> {
    fetcher: F,
    interval: Interval,
    previous: Option<Vec<LinkSnapshot>>,
}

impl<F> Stream for PollingEventStream<F>
where
    F: AddressFetcher + Unpin,
{
    type Item = NetworkEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            ready!(this.interval.poll_tick(cx));

            match this.fetcher.fetch() {
                Ok(current) => {
                    let first = this.previous.is_none();
                    let changed = this.previous.as_ref().is_some_and(|prev| *prev != current);
                    this.previous = Some(current);

                    if first {
                        return Poll::Ready(Some(NetworkEvent::Available(NetworkId::UNKNOWN)));
                    }
                    if changed {
                        return Poll::Ready(Some(NetworkEvent::LinkPropertiesChanged(
                            NetworkId::UNKNOWN,
                        )));
                    }
                }
                Err(error) => {
                    tracing::warn!("link enumeration failed during poll: {error}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{FetchError, LinkAddress};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio_stream::StreamExt;

    struct ScriptedFetcher {
        results: Mutex<VecDeque<Result<Vec<LinkSnapshot>, FetchError>>>,
    }

    impl ScriptedFetcher {
        fn new(results: Vec<Result<Vec<LinkSnapshot>, FetchError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
            }
        }
    }

    impl AddressFetcher for ScriptedFetcher {
        fn fetch(&self) -> Result<Vec<LinkSnapshot>, FetchError> {
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![]))
        }
    }

    fn snapshot(address: &str) -> Vec<LinkSnapshot> {
        vec![LinkSnapshot::new(
            "eth0",
            vec![LinkAddress::new(address.parse().unwrap())],
        )]
    }

    #[tokio::test(start_paused = true)]
    async fn first_fetch_announces_availability() {
        let fetcher = ScriptedFetcher::new(vec![Ok(snapshot("192.168.1.1"))]);
        let source = PollingNetworkEvents::new(fetcher, Duration::from_secs(30));
        let mut stream = source.into_stream();

        assert_eq!(
            stream.next().await,
            Some(NetworkEvent::Available(NetworkId::UNKNOWN))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_change_emits_link_properties_event() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(snapshot("192.168.1.1")),
            Ok(snapshot("192.168.1.1")),
            Ok(snapshot("192.168.1.2")),
        ]);
        let source = PollingNetworkEvents::new(fetcher, Duration::from_secs(30));
        let mut stream = source.into_stream();

        let events: Vec<_> = (&mut stream).take(2).collect().await;

        assert_eq!(
            events,
            vec![
                NetworkEvent::Available(NetworkId::UNKNOWN),
                NetworkEvent::LinkPropertiesChanged(NetworkId::UNKNOWN),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_errors_are_skipped_and_baseline_kept() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(snapshot("192.168.1.1")),
            Err(FetchError::Platform {
                message: "transient".to_string(),
            }),
            Ok(snapshot("192.168.1.2")),
        ]);
        let source = PollingNetworkEvents::new(fetcher, Duration::from_secs(30));
        let mut stream = source.into_stream();

        let events: Vec<_> = (&mut stream).take(2).collect().await;

        // The error poll produced nothing; the change was still seen
        // against the pre-error baseline.
        assert_eq!(
            events,
            vec![
                NetworkEvent::Available(NetworkId::UNKNOWN),
                NetworkEvent::LinkPropertiesChanged(NetworkId::UNKNOWN),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn identical_snapshots_stay_silent() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(snapshot("10.0.0.1")),
            Ok(snapshot("10.0.0.1")),
            Ok(snapshot("10.0.0.1")),
        ]);
        let source = PollingNetworkEvents::new(fetcher, Duration::from_secs(30));
        let mut stream = source.into_stream();

        assert_eq!(
            stream.next().await,
            Some(NetworkEvent::Available(NetworkId::UNKNOWN))
        );

        // Two more polls see the same snapshot; nothing is emitted.
        let quiet = tokio::time::timeout(Duration::from_secs(65), stream.next()).await;
        assert!(quiet.is_err());
    }
}
