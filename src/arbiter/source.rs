//! Suspend source identities and priorities.

use std::fmt;

/// A named, prioritized origin of a suspend/resume request.
///
/// Higher priority takes precedence when several sources want suspend
/// at the same time. Priorities are distinct, so the dominant source
/// is always unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuspendSource {
    /// The device address matched a user-configured IP rule.
    SmartSuspend,
    /// The screen is off and the device entered idle/doze mode.
    Doze,
}

impl SuspendSource {
    /// All sources in descending priority order.
    const BY_PRIORITY: [Self; 2] = [Self::SmartSuspend, Self::Doze];

    /// Returns the fixed priority of this source (higher wins).
    #[must_use]
    pub const fn priority(self) -> u32 {
        match self {
            Self::SmartSuspend => 100,
            Self::Doze => 50,
        }
    }

    /// Iterates all sources from highest to lowest priority.
    pub fn by_priority() -> impl Iterator<Item = Self> {
        Self::BY_PRIORITY.into_iter()
    }
}

impl fmt::Display for SuspendSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmartSuspend => write!(f, "smart-suspend"),
            Self::Doze => write!(f, "doze"),
        }
    }
}
