//! `sysinfo`-backed link enumeration.

use std::net::IpAddr;

use sysinfo::Networks;

use crate::network::{AddressFetcher, FetchError, LinkAddress, LinkSnapshot};

/// Fetches link addresses through [`sysinfo::Networks`].
///
/// Every call performs a fresh interface refresh; nothing is cached
/// between checks. IPv6 addresses are skipped, since the matcher only
/// understands IPv4.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoFetcher;

impl SysinfoFetcher {
    /// Creates a new fetcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AddressFetcher for SysinfoFetcher {
    fn fetch(&self) -> Result<Vec<LinkSnapshot>, FetchError> {
        let networks = Networks::new_with_refreshed_list();

        let mut links = Vec::new();
        for (name, data) in &networks {
            let addresses = data
                .ip_networks()
                .iter()
                .filter_map(|ip_network| match ip_network.addr {
                    IpAddr::V4(v4) => Some(LinkAddress::new(v4)),
                    IpAddr::V6(_) => None,
                })
                .collect();

            links.push(LinkSnapshot::new(name.as_str(), addresses));
        }

        Ok(links)
    }
}
