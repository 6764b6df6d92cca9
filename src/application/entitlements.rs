//! Premium entitlement reads and mutations.
//!
//! Every capability here swallows store failures. Reads fail CLOSED: a
//! store outage never grants unlimited use. Writes signal non-application
//! through their boolean return so the caller can retry or alert.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::application::config::QuotaConfig;
use crate::application::metrics::Metrics;
use crate::application::ports::{Clock, KeyValueStore};
use crate::domain::premium::PremiumRecord;

const SECS_PER_DAY: u64 = 86_400;

/// Storage key for a user's premium record. Namespacing is part of the
/// storage compatibility contract.
pub(crate) fn premium_key(user_id: &str) -> String {
    format!("premium:{user_id}")
}

/// Premium entitlement store for a single key-value collaborator.
///
/// Generic over the store so deployments pick the adapter (in-memory,
/// Redis, or a custom [`KeyValueStore`] implementation) without touching
/// this logic. The store handle is passed in explicitly, never held as
/// global state, which keeps the component testable with an in-memory
/// fake.
#[derive(Debug, Clone)]
pub struct Entitlements<S>
where
    S: KeyValueStore + Clone,
{
    store: S,
    clock: Arc<dyn Clock>,
    config: QuotaConfig,
    metrics: Metrics,
}

impl<S> Entitlements<S>
where
    S: KeyValueStore + Clone,
{
    /// Create an entitlement store with the default [`QuotaConfig`].
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(store, clock, QuotaConfig::default())
    }

    /// Create an entitlement store with a custom configuration.
    pub fn with_config(store: S, clock: Arc<dyn Clock>, config: QuotaConfig) -> Self {
        Self::with_parts(store, clock, config, Metrics::new())
    }

    /// Internal constructor sharing a metrics handle with a ledger.
    pub(crate) fn with_parts(
        store: S,
        clock: Arc<dyn Clock>,
        config: QuotaConfig,
        metrics: Metrics,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            metrics,
        }
    }

    /// Get the metrics handle.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Whether `user_id` currently holds a valid premium entitlement.
    ///
    /// An expired record is removed as a side effect the first time it is
    /// read past its expiry (lazy expiration); removal failure is tolerated
    /// since the answer is false either way. Store or decode failures also
    /// yield false, so an outage cannot grant unlimited use.
    pub async fn is_premium(&self, user_id: &str) -> bool {
        let key = premium_key(user_id);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                warn!(error = %err, key = %key, "premium lookup failed; treating user as free");
                self.metrics.record_store_failure();
                return false;
            }
        };

        let record: PremiumRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, key = %key, "malformed premium record; treating user as free");
                self.metrics.record_store_failure();
                return false;
            }
        };

        if record.is_expired(self.clock.now_millis()) {
            match self.store.delete(&key).await {
                Ok(()) => debug!(user_id, "expired premium record removed"),
                Err(err) => {
                    warn!(error = %err, key = %key, "failed to remove expired premium record");
                    self.metrics.record_store_failure();
                }
            }
            return false;
        }

        true
    }

    /// Grant premium for the default duration (365 days unless configured
    /// otherwise).
    ///
    /// Returns false if the entitlement was not applied; see [`grant_for`].
    ///
    /// [`grant_for`]: Entitlements::grant_for
    pub async fn grant(&self, user_id: &str) -> bool {
        self.grant_for(user_id, self.config.default_premium_days)
            .await
    }

    /// Grant premium for `days` calendar days starting now.
    ///
    /// The record is written unconditionally: last writer wins, and a new
    /// grant replaces rather than extends any remaining time. The store is
    /// asked to retain the record for `days` plus a grace window, so the
    /// lazy-expiry read path can observe and clean a stale record.
    ///
    /// Returns false on store-write failure, meaning "entitlement not
    /// applied"; the caller is expected to retry or alert.
    pub async fn grant_for(&self, user_id: &str, days: NonZeroU32) -> bool {
        let now = self.clock.now_millis();
        let record = PremiumRecord::new(user_id, now, days);

        let body = match serde_json::to_string(&record) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, user_id, "failed to encode premium record");
                self.metrics.record_store_failure();
                return false;
            }
        };

        let retention_days =
            u64::from(days.get()) + u64::from(self.config.premium_ttl_grace_days);
        let ttl = Duration::from_secs(retention_days * SECS_PER_DAY);

        match self.store.put(&premium_key(user_id), body, Some(ttl)).await {
            Ok(()) => {
                debug!(user_id, days = days.get(), "premium granted");
                true
            }
            Err(err) => {
                warn!(error = %err, user_id, "premium grant not applied; store write failed");
                self.metrics.record_store_failure();
                false
            }
        }
    }

    /// Revoke any premium entitlement for `user_id`.
    ///
    /// Deleting an absent record is success; only a store failure yields
    /// false.
    pub async fn revoke(&self, user_id: &str) -> bool {
        match self.store.delete(&premium_key(user_id)).await {
            Ok(()) => {
                debug!(user_id, "premium revoked");
                true
            }
            Err(err) => {
                warn!(error = %err, user_id, "premium revocation not applied; store delete failed");
                self.metrics.record_store_failure();
                false
            }
        }
    }
}
