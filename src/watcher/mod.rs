//! Watchers feeding the suspend arbitrator.
//!
//! This module provides:
//! - Delay-coalescing of bursty triggers ([`Debouncer`])
//! - Event types and subscription seams ([`events`])
//! - A polling event source for push-less platforms
//!   ([`PollingNetworkEvents`])
//! - The network-rule watcher ([`SmartSuspendWatcher`])
//! - The screen/idle watcher ([`IdleWatcher`])
//!
//! Each watcher owns its subscription task and reports a single
//! boolean to the arbitrator under its own
//! [`SuspendSource`](crate::arbiter::SuspendSource). Uninstalling a
//! watcher always forces its source back to `false`, so no source can
//! hold a stale suspend request after teardown.

mod debounce;
pub mod events;
mod idle;
mod poll;
mod smart;

#[cfg(test)]
mod smart_tests;

pub use debounce::{DEBOUNCE_DELAY, Debouncer};
pub use events::{
    ChannelEvents, EventSender, NetworkEvent, NetworkEvents, NetworkId, PowerEvent, PowerEvents,
    PowerStateProbe, UnavailablePowerProbe,
};
pub use idle::IdleWatcher;
pub use poll::PollingNetworkEvents;
pub use smart::SmartSuspendWatcher;
