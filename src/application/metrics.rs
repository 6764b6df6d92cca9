//! Observability metrics for quota enforcement.
//!
//! Provides counters about check outcomes and store health for monitoring
//! and debugging. Because store failures are swallowed by design, the
//! `store_failures` counter (together with the warn-level logs) is the main
//! signal that the collaborator is degraded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking quota enforcement statistics.
///
/// All counters use atomic operations for thread-safe updates and reads.
/// Cloning is cheap and all clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Checks that came back allowed (including premium short-circuits).
    checks_allowed: AtomicU64,
    /// Checks that came back denied.
    checks_denied: AtomicU64,
    /// Checks short-circuited by a valid premium entitlement.
    premium_hits: AtomicU64,
    /// Usage events successfully persisted.
    events_recorded: AtomicU64,
    /// Store operations that failed and were swallowed.
    store_failures: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                checks_allowed: AtomicU64::new(0),
                checks_denied: AtomicU64::new(0),
                premium_hits: AtomicU64::new(0),
                events_recorded: AtomicU64::new(0),
                store_failures: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_allowed(&self) {
        self.inner.checks_allowed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_denied(&self) {
        self.inner.checks_denied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_premium_hit(&self) {
        self.inner.premium_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_event(&self) {
        self.inner.events_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_store_failure(&self) {
        self.inner.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Total checks that came back allowed.
    pub fn checks_allowed(&self) -> u64 {
        self.inner.checks_allowed.load(Ordering::Relaxed)
    }

    /// Total checks that came back denied.
    pub fn checks_denied(&self) -> u64 {
        self.inner.checks_denied.load(Ordering::Relaxed)
    }

    /// Total checks short-circuited by a premium entitlement.
    pub fn premium_hits(&self) -> u64 {
        self.inner.premium_hits.load(Ordering::Relaxed)
    }

    /// Total usage events successfully persisted.
    pub fn events_recorded(&self) -> u64 {
        self.inner.events_recorded.load(Ordering::Relaxed)
    }

    /// Total store operations that failed and were swallowed.
    pub fn store_failures(&self) -> u64 {
        self.inner.store_failures.load(Ordering::Relaxed)
    }

    /// Get a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            checks_allowed: self.checks_allowed(),
            checks_denied: self.checks_denied(),
            premium_hits: self.premium_hits(),
            events_recorded: self.events_recorded(),
            store_failures: self.store_failures(),
        }
    }

    /// Reset all counters to zero.
    ///
    /// Useful for testing or when starting a new monitoring period.
    pub fn reset(&self) {
        self.inner.checks_allowed.store(0, Ordering::Relaxed);
        self.inner.checks_denied.store(0, Ordering::Relaxed);
        self.inner.premium_hits.store(0, Ordering::Relaxed);
        self.inner.events_recorded.store(0, Ordering::Relaxed);
        self.inner.store_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total checks that came back allowed.
    pub checks_allowed: u64,
    /// Total checks that came back denied.
    pub checks_denied: u64,
    /// Total checks short-circuited by a premium entitlement.
    pub premium_hits: u64,
    /// Total usage events successfully persisted.
    pub events_recorded: u64,
    /// Total store operations that failed and were swallowed.
    pub store_failures: u64,
}

impl MetricsSnapshot {
    /// Total number of quota checks.
    pub fn total_checks(&self) -> u64 {
        self.checks_allowed.saturating_add(self.checks_denied)
    }

    /// Ratio of denied checks to total checks (0.0 to 1.0).
    ///
    /// Returns 0.0 if no checks have been processed.
    pub fn denial_rate(&self) -> f64 {
        let total = self.total_checks();
        if total == 0 {
            0.0
        } else {
            self.checks_denied as f64 / total as f64
        }
    }
}
