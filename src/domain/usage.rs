//! Usage events and rolling-window quota computation.
//!
//! A user's usage log is an append-only sequence of events; how many of them
//! still "count" is re-evaluated against a window measured backward from now
//! on every check, rather than reset at fixed boundaries.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One consumed action, stamped with wall-clock time.
///
/// Events are immutable once created. The per-user log keeps them in
/// insertion order, which is also chronological order.
///
/// Wire shape: `{"timestamp": <epoch-millis>}`. This is a compatibility
/// requirement and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    /// Wall-clock timestamp in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl UsageEvent {
    /// Create an event at the given epoch-millisecond timestamp.
    pub fn at(timestamp: u64) -> Self {
        Self { timestamp }
    }

    /// Whether this event falls inside the rolling window ending at `now`.
    ///
    /// The comparison is strict: an event whose age exactly equals the window
    /// length is already outside it. Events with timestamps in the future
    /// (clock skew) have age zero and are counted.
    pub fn in_window(&self, now: u64, window: Duration) -> bool {
        let age = now.saturating_sub(self.timestamp);
        (age as u128) < window.as_millis()
    }
}

/// Count the events of `log` inside the rolling window ending at `now`.
pub fn count_in_window(log: &[UsageEvent], now: u64, window: Duration) -> usize {
    log.iter().filter(|e| e.in_window(now, window)).count()
}

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    /// Whether the requested action may proceed.
    pub allowed: bool,
    /// Actions left in the current window; `None` means unbounded (premium).
    pub remaining: Option<u32>,
    /// Whether a valid premium entitlement short-circuited the check.
    pub is_premium: bool,
}

impl QuotaStatus {
    /// Status for a user with a valid premium entitlement.
    pub fn premium() -> Self {
        Self {
            allowed: true,
            remaining: None,
            is_premium: true,
        }
    }

    /// Status for a free user who has consumed `used` actions of `limit`.
    pub fn free(used: usize, limit: u32) -> Self {
        let used = u32::try_from(used).unwrap_or(u32::MAX);
        Self {
            allowed: used < limit,
            remaining: Some(limit.saturating_sub(used)),
            is_premium: false,
        }
    }

    /// Whether the allowance is unbounded.
    pub fn is_unlimited(&self) -> bool {
        self.remaining.is_none()
    }
}
