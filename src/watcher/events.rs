//! Event types and subscription seams for the watchers.
//!
//! The operating system's connectivity and power facilities are
//! consumed as plain event streams. A subscription is modeled as a
//! value implementing [`NetworkEvents`] or [`PowerEvents`]: consuming
//! it yields the stream, dropping the producer ends it. Hosts that
//! receive platform broadcasts push them through [`channel`]; tests
//! do the same synchronously.

use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Opaque identity of a network link, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(u64);

impl NetworkId {
    /// Identity used when the event producer cannot name a specific
    /// link (e.g., a synthesized polling event).
    pub const UNKNOWN: Self = Self(0);

    /// Creates a network identity from the platform's raw handle.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A connectivity change notification.
///
/// The carried [`NetworkId`] identifies which link changed, but
/// watchers re-enumerate all links on every check rather than tracking
/// per-link state, so it serves logging more than logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkEvent {
    /// A link became available.
    Available(NetworkId),
    /// A link's addresses or routes changed.
    LinkPropertiesChanged(NetworkId),
    /// A link was lost.
    Lost(NetworkId),
    /// A link's capabilities changed.
    CapabilitiesChanged(NetworkId),
}

impl NetworkEvent {
    /// Returns the link this event concerns.
    #[must_use]
    pub const fn network(self) -> NetworkId {
        match self {
            Self::Available(id)
            | Self::LinkPropertiesChanged(id)
            | Self::Lost(id)
            | Self::CapabilitiesChanged(id) => id,
        }
    }
}

/// A screen or idle-mode change notification.
///
/// The payload is deliberately empty: the watcher queries the current
/// screen/idle state through [`PowerStateProbe`] instead of trusting
/// possibly stale event data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    /// The screen turned on.
    ScreenOn,
    /// The screen turned off.
    ScreenOff,
    /// The device entered or left idle/doze mode.
    IdleModeChanged,
}

/// Subscription to connectivity change events.
///
/// `into_stream` consumes `self`, enforcing one-time use; unsubscribe
/// by dropping the stream (or aborting the task driving it).
pub trait NetworkEvents: Send {
    /// The stream type produced by this subscription.
    ///
    /// `'static` because watchers drive the stream from a spawned
    /// task.
    type Stream: Stream<Item = NetworkEvent> + Send + Unpin + 'static;

    /// Converts this subscription into its event stream.
    fn into_stream(self) -> Self::Stream;
}

/// Subscription to screen/idle power events.
pub trait PowerEvents: Send {
    /// The stream type produced by this subscription.
    type Stream: Stream<Item = PowerEvent> + Send + Unpin + 'static;

    /// Converts this subscription into its event stream.
    fn into_stream(self) -> Self::Stream;
}

/// Queryable power state, independent of the event stream.
pub trait PowerStateProbe: Send + Sync {
    /// Returns true if the display is interactive.
    fn is_screen_on(&self) -> bool;

    /// Returns true if the device is in idle/doze mode.
    fn is_device_idle(&self) -> bool;
}

/// Probe for platforms without a power service.
///
/// Reports the degraded defaults: screen on, not idle. With these the
/// doze source never requests suspend, which is the required
/// failure direction (absence of evidence must not suspend the
/// engine).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePowerProbe;

impl PowerStateProbe for UnavailablePowerProbe {
    fn is_screen_on(&self) -> bool {
        true
    }

    fn is_device_idle(&self) -> bool {
        false
    }
}

/// Producer half of an event channel.
///
/// Cloneable so several platform callbacks can push into the same
/// subscription.
#[derive(Debug)]
pub struct EventSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> EventSender<T> {
    /// Pushes an event to the subscriber.
    ///
    /// Returns false if the subscription was dropped; late events
    /// after teardown are expected and not an error.
    pub fn send(&self, event: T) -> bool {
        self.tx.send(event).is_ok()
    }
}

impl<T> Clone for EventSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Subscriber half of an event channel.
#[derive(Debug)]
pub struct ChannelEvents<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl NetworkEvents for ChannelEvents<NetworkEvent> {
    type Stream = UnboundedReceiverStream<NetworkEvent>;

    fn into_stream(self) -> Self::Stream {
        UnboundedReceiverStream::new(self.rx)
    }
}

impl PowerEvents for ChannelEvents<PowerEvent> {
    type Stream = UnboundedReceiverStream<PowerEvent>;

    fn into_stream(self) -> Self::Stream {
        UnboundedReceiverStream::new(self.rx)
    }
}

/// Creates an event channel pair: the sender side for the host's
/// platform callbacks, the receiver side to hand to a watcher's
/// `install`.
#[must_use]
pub fn channel<T>() -> (EventSender<T>, ChannelEvents<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, ChannelEvents { rx })
}
