//! Rolling-window usage accounting.
//!
//! The ledger fails OPEN: when the store is unreachable, checks come back
//! allowed with a full allowance rather than blocking users, prioritizing
//! availability of the underlying service over strict quota enforcement
//! during an outage. (Entitlement reads underneath still fail closed; see
//! [`Entitlements`].)

use std::sync::Arc;

use tracing::warn;

use crate::application::config::QuotaConfig;
use crate::application::entitlements::Entitlements;
use crate::application::metrics::Metrics;
use crate::application::ports::{Clock, KeyValueStore};
use crate::domain::usage::{count_in_window, QuotaStatus, UsageEvent};

/// Storage key for a user's usage log. Namespacing is part of the storage
/// compatibility contract.
pub(crate) fn usage_key(user_id: &str) -> String {
    format!("usage:{user_id}")
}

/// Per-user usage ledger over a key-value collaborator.
///
/// The intended calling pattern is `check_limit` before the action and, if
/// it was allowed and performed, a separate `record_usage` afterwards. The
/// ledger does not enforce that ordering and has no reserve/commit
/// protocol.
#[derive(Debug, Clone)]
pub struct UsageLedger<S>
where
    S: KeyValueStore + Clone,
{
    store: S,
    entitlements: Entitlements<S>,
    clock: Arc<dyn Clock>,
    config: QuotaConfig,
    metrics: Metrics,
}

impl<S> UsageLedger<S>
where
    S: KeyValueStore + Clone,
{
    /// Create a ledger with the default [`QuotaConfig`].
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(store, clock, QuotaConfig::default())
    }

    /// Create a ledger with a custom configuration.
    pub fn with_config(store: S, clock: Arc<dyn Clock>, config: QuotaConfig) -> Self {
        let metrics = Metrics::new();
        let entitlements = Entitlements::with_parts(
            store.clone(),
            clock.clone(),
            config.clone(),
            metrics.clone(),
        );
        Self {
            store,
            entitlements,
            clock,
            config,
            metrics,
        }
    }

    /// Get the entitlement store sharing this ledger's collaborator.
    pub fn entitlements(&self) -> &Entitlements<S> {
        &self.entitlements
    }

    /// Get the metrics handle (shared with the entitlement store).
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Decide whether `user_id` may take another action.
    ///
    /// A valid premium entitlement short-circuits the check with an
    /// unbounded allowance; no usage computation is performed. Otherwise the
    /// recorded events are filtered to those strictly younger than the
    /// rolling window and counted against the free-tier limit. Events are
    /// only logically excluded here, never pruned; physical cleanup is the
    /// store's coarser TTL-based retention.
    ///
    /// Never returns an error: a failed event load reads as an empty log,
    /// which yields the fail-open full allowance.
    pub async fn check_limit(&self, user_id: &str) -> QuotaStatus {
        if self.entitlements.is_premium(user_id).await {
            self.metrics.record_premium_hit();
            self.metrics.record_allowed();
            return QuotaStatus::premium();
        }

        let log = self.load_log(user_id).await;
        let now = self.clock.now_millis();
        let used = count_in_window(&log, now, self.config.usage_window);

        let status = QuotaStatus::free(used, self.config.free_tier_limit);
        if status.allowed {
            self.metrics.record_allowed();
        } else {
            self.metrics.record_denied();
        }
        status
    }

    /// Append one usage event at the current time. Best effort.
    ///
    /// The full log is read, appended to, and written back with the
    /// retention TTL measured from this write. There is no read-modify-write
    /// atomicity: two concurrent calls for the same user can both read the
    /// same prior log and the later write wins, silently dropping the other
    /// append. Write failures are swallowed; nothing is signalled to the
    /// caller.
    pub async fn record_usage(&self, user_id: &str) {
        let mut log = self.load_log(user_id).await;
        log.push(UsageEvent::at(self.clock.now_millis()));

        let key = usage_key(user_id);
        let body = match serde_json::to_string(&log) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, key = %key, "failed to encode usage log; event dropped");
                self.metrics.record_store_failure();
                return;
            }
        };

        match self
            .store
            .put(&key, body, Some(self.config.usage_retention))
            .await
        {
            Ok(()) => self.metrics.record_event(),
            Err(err) => {
                warn!(error = %err, key = %key, "usage event dropped; store write failed");
                self.metrics.record_store_failure();
            }
        }
    }

    /// Load the recorded event sequence, treating absence and any
    /// read/decode failure as an empty log.
    async fn load_log(&self, user_id: &str) -> Vec<UsageEvent> {
        let key = usage_key(user_id);
        match self.store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(log) => log,
                Err(err) => {
                    warn!(error = %err, key = %key, "malformed usage log; treating as empty");
                    self.metrics.record_store_failure();
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, key = %key, "usage log read failed; treating as empty");
                self.metrics.record_store_failure();
                Vec::new()
            }
        }
    }
}
