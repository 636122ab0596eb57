//! IP rule parsing and matching.
//!
//! This module provides:
//! - The parsed rule container ([`RuleSet`])
//! - Pure matching functions over observed addresses ([`matches`], [`match_one`])
//!
//! Rules come from a single user-supplied string of comma-separated
//! entries, each either a literal IPv4 address (`"10.0.0.1"`) or a
//! CIDR range (`"192.168.0.0/16"`). Malformed rules are never an
//! error; they simply match nothing.

mod matcher;
mod ruleset;

pub use matcher::{match_one, matches};
pub use ruleset::{MAX_RULES, RuleSet};
