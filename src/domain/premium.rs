//! Premium entitlement records.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Milliseconds in one calendar day.
pub const MILLIS_PER_DAY: u64 = 86_400_000;

/// A time-bounded premium grant for one user.
///
/// Invariant: `expires_at = activated_at + duration_days * 86_400_000`.
///
/// Lifecycle: created on grant, superseded by a later grant (overwrite),
/// lazily deleted on first read after expiry, or explicitly deleted on
/// revocation.
///
/// Wire shape (JSON, camelCase field names) under `premium:{userId}`:
/// `{"userId": ..., "activatedAt": ..., "expiresAt": ..., "durationDays": ...}`.
/// This is a compatibility requirement and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumRecord {
    /// Opaque, stable user identifier.
    pub user_id: String,
    /// Epoch milliseconds at which the grant was made.
    pub activated_at: u64,
    /// Epoch milliseconds past which the grant no longer applies.
    pub expires_at: u64,
    /// Grant length in calendar days.
    pub duration_days: u32,
}

impl PremiumRecord {
    /// Create a grant starting at `now` and lasting `duration_days` days.
    pub fn new(user_id: impl Into<String>, now: u64, duration_days: NonZeroU32) -> Self {
        let days = duration_days.get();
        Self {
            user_id: user_id.into(),
            activated_at: now,
            expires_at: now + u64::from(days) * MILLIS_PER_DAY,
            duration_days: days,
        }
    }

    /// Whether the grant has expired as of `now`.
    ///
    /// Strict comparison: a record whose `expires_at` equals `now` is still
    /// valid.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at < now
    }
}
