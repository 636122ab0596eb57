//! Link address types and address-set gathering.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// A single IPv4 address on a link, with the platform's loopback flag.
///
/// The flag comes from the platform rather than being derived from the
/// address, mirroring how link properties report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAddress {
    /// The assigned IPv4 address.
    pub address: Ipv4Addr,
    /// Whether the platform marks this address as loopback.
    pub loopback: bool,
}

impl LinkAddress {
    /// Creates a link address, deriving the loopback flag from the
    /// address range.
    #[must_use]
    pub const fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            loopback: address.is_loopback(),
        }
    }

    /// Creates a link address with an explicit loopback flag.
    #[must_use]
    pub const fn with_loopback(address: Ipv4Addr, loopback: bool) -> Self {
        Self { address, loopback }
    }
}

/// The IPv4 addresses of a single active network link at a point in
/// time.
///
/// Snapshots are rebuilt fully on every check; nothing tracks
/// staleness beyond the moment of the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    /// The platform's name for the link (e.g., "wlan0", "Ethernet").
    pub name: String,
    /// All IPv4 addresses assigned to this link.
    pub addresses: Vec<LinkAddress>,
}

impl LinkSnapshot {
    /// Creates a new link snapshot.
    #[must_use]
    pub fn new(name: impl Into<String>, addresses: Vec<LinkAddress>) -> Self {
        Self {
            name: name.into(),
            addresses,
        }
    }

    /// Returns true if this link has at least one non-loopback address.
    #[must_use]
    pub fn has_routable_addresses(&self) -> bool {
        self.addresses.iter().any(|a| !a.loopback)
    }
}

/// Collects the non-loopback IPv4 addresses of all links into the set
/// the rule matcher consumes.
///
/// Addresses are rendered to dotted-decimal strings; duplicates across
/// links collapse.
#[must_use]
pub fn observed_addresses(links: &[LinkSnapshot]) -> HashSet<String> {
    links
        .iter()
        .flat_map(|link| link.addresses.iter())
        .filter(|addr| !addr.loopback)
        .map(|addr| addr.address.to_string())
        .collect()
}
