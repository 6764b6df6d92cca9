//! Outage behavior: every capability degrades to its documented fallback
//! instead of surfacing an error.

use async_trait::async_trait;
use quota_guard::{
    Clock, Entitlements, KeyValueStore, QuotaStatus, StoreError, SystemClock, UsageLedger,
};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Store double whose every operation fails, counting attempts.
#[derive(Debug, Clone, Default)]
struct OutageStore {
    calls: Arc<AtomicU64>,
}

impl OutageStore {
    fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> StoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StoreError::Backend("connection refused".to_string())
    }
}

#[async_trait]
impl KeyValueStore for OutageStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(self.fail())
    }

    async fn put(
        &self,
        _key: &str,
        _value: String,
        _ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        Err(self.fail())
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(self.fail())
    }
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock::new())
}

#[tokio::test]
async fn check_limit_fails_open_with_the_exact_fallback() {
    let ledger = UsageLedger::new(OutageStore::new(), clock());

    let status = ledger.check_limit("alice").await;
    assert_eq!(
        status,
        QuotaStatus {
            allowed: true,
            remaining: Some(3),
            is_premium: false,
        }
    );
}

#[tokio::test]
async fn is_premium_fails_closed() {
    let entitlements = Entitlements::new(OutageStore::new(), clock());
    assert!(!entitlements.is_premium("alice").await);
}

#[tokio::test]
async fn grant_and_revoke_signal_non_application() {
    let entitlements = Entitlements::new(OutageStore::new(), clock());

    assert!(!entitlements.grant("alice").await);
    assert!(!entitlements.grant_for("alice", NonZeroU32::new(30).unwrap()).await);
    assert!(!entitlements.revoke("alice").await);
}

#[tokio::test]
async fn revoke_is_consistent_across_repeated_outage_calls() {
    let entitlements = Entitlements::new(OutageStore::new(), clock());

    // Both attempts fail the same way; neither raises.
    assert!(!entitlements.revoke("alice").await);
    assert!(!entitlements.revoke("alice").await);
}

#[tokio::test]
async fn record_usage_swallows_failures_silently() {
    let store = OutageStore::new();
    let ledger = UsageLedger::new(store.clone(), clock());

    ledger.record_usage("alice").await;

    // It did try the store (read then write) but reported nothing.
    assert_eq!(store.calls(), 2);
    assert_eq!(ledger.metrics().events_recorded(), 0);
}

#[tokio::test]
async fn swallowed_failures_are_observable_through_metrics() {
    let ledger = UsageLedger::new(OutageStore::new(), clock());

    ledger.check_limit("alice").await;
    ledger.record_usage("alice").await;

    // premium lookup + usage read + usage read + usage write
    assert_eq!(ledger.metrics().store_failures(), 4);
    assert_eq!(ledger.metrics().checks_allowed(), 1);
}
