//! Pure matching of observed addresses against IP rules.
//!
//! Matching never fails: a rule or address that cannot be parsed is
//! treated as non-matching. A suspend decision must not be reached on
//! faulty data, and arbitration must never panic, so every error path
//! here collapses to `false`.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use super::RuleSet;

/// Returns true iff at least one observed address matches at least
/// one rule.
///
/// Logical OR across the full cross-product; the first match
/// short-circuits. Empty addresses or empty rules always yield
/// `false`.
#[must_use]
pub fn matches(addresses: &HashSet<String>, rules: &RuleSet) -> bool {
    if addresses.is_empty() || rules.is_empty() {
        return false;
    }

    addresses
        .iter()
        .any(|address| rules.entries().iter().any(|rule| match_one(address, rule)))
}

/// Tests a single observed address against a single rule.
///
/// A rule containing `/` is interpreted as CIDR; anything else is an
/// exact comparison of the dotted-decimal strings with no
/// normalization (`"192.168.1.1"` does not equal `"192.168.01.1"`).
///
/// # Examples
///
/// ```
/// use suspend_gate::rules::match_one;
///
/// assert!(match_one("192.168.1.5", "192.168.1.0/24"));
/// assert!(!match_one("192.168.2.5", "192.168.1.0/24"));
/// assert!(match_one("10.0.0.1", "10.0.0.1"));
/// assert!(!match_one("10.0.0.2", "10.0.0.1"));
/// ```
#[must_use]
pub fn match_one(address: &str, rule: &str) -> bool {
    rule.split_once('/').map_or_else(
        || address == rule,
        |(network, prefix)| match_cidr(address, network, prefix),
    )
}

/// CIDR containment test.
///
/// The prefix length must be an integer in `0..=32`; anything else
/// makes the rule match nothing. Addresses convert to `u32` in
/// big-endian byte order (first octet in the most significant byte),
/// which is exactly what `u32::from(Ipv4Addr)` produces. A prefix of
/// zero yields an all-zero mask rather than a shift by 32.
fn match_cidr(address: &str, network: &str, prefix: &str) -> bool {
    let Ok(prefix_len) = prefix.parse::<u8>() else {
        return false;
    };
    if prefix_len > 32 {
        return false;
    }

    let (Ok(observed), Ok(network)) = (address.parse::<Ipv4Addr>(), network.parse::<Ipv4Addr>())
    else {
        return false;
    };

    let mask = if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix_len))
    };

    (u32::from(observed) & mask) == (u32::from(network) & mask)
}
