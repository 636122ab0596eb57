//! Platform address enumeration.
//!
//! A single `sysinfo`-backed implementation of
//! [`AddressFetcher`](super::AddressFetcher) covers every supported
//! target; there is no per-OS code here.

mod sysinfo_fetcher;

pub use sysinfo_fetcher::SysinfoFetcher;

/// Alias kept so call sites read the same on every platform.
pub use sysinfo_fetcher::SysinfoFetcher as PlatformFetcher;
