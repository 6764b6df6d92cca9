//! # quota-guard
//!
//! Freemium usage quotas and premium entitlements over a TTL-capable
//! key-value store.
//!
//! Free users get a fixed number of actions (3 by default) per rolling
//! 24-hour window; premium users get an unbounded allowance for the length
//! of a time-boxed grant. State lives in an external key-value store with
//! per-key expiration, reached through the [`KeyValueStore`] port, so the
//! same logic runs against an in-memory map, Redis, or any custom adapter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quota_guard::{MemoryStore, SystemClock, UsageLedger};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ledger = UsageLedger::new(MemoryStore::new(), Arc::new(SystemClock::new()));
//!
//!     let status = ledger.check_limit("user-17").await;
//!     if status.allowed {
//!         // ... perform the action, then record it:
//!         ledger.record_usage("user-17").await;
//!     }
//!
//!     // Upgrade flow: grant premium for the default 365 days.
//!     if !ledger.entitlements().grant("user-17").await {
//!         // grant not applied (store failure); retry or alert
//!     }
//! }
//! ```
//!
//! ## Failure Philosophy
//!
//! Store failures never surface as errors from the public capabilities;
//! each one has a defined fallback instead:
//!
//! - [`UsageLedger::check_limit`] fails OPEN, returning a full free-tier
//!   allowance. A store outage degrades quota enforcement, not the service
//!   sitting on top of it.
//! - [`Entitlements::is_premium`] fails CLOSED, returning `false`. An
//!   outage never hands out unlimited use.
//! - [`Entitlements::grant`] / [`Entitlements::revoke`] return `false` so
//!   the caller can retry or alert.
//! - [`UsageLedger::record_usage`] is best-effort and swallows failures
//!   silently.
//!
//! Every swallowed failure is logged at warn level via `tracing` and
//! counted in [`Metrics`].
//!
//! ## Storage Layout
//!
//! Keyed by string, JSON values, relative TTLs enforced by the store:
//!
//! - `usage:{userId}` → `[{"timestamp": <epoch-millis>}, ...]`, retained
//!   48 hours from the most recent write.
//! - `premium:{userId}` → `{"userId", "activatedAt", "expiresAt",
//!   "durationDays"}`, retained for the grant length plus a 7-day grace
//!   window so expired records can be observed and lazily removed.
//!
//! These key names and shapes are a compatibility contract with other
//! services sharing the store.
//!
//! ## Features
//!
//! - `redis-store`: [`RedisStore`] adapter backed by
//!   `redis::aio::ConnectionManager`.
//! - `test-helpers`: exposes `MockClock` and `FailingStore` for downstream
//!   tests.
//!
//! ## Concurrency
//!
//! Each capability performs at most one read plus one conditional write or
//! delete, awaiting only the store. There is no cross-call locking:
//! concurrent [`UsageLedger::record_usage`] calls for the same user can
//! race and the later write wins, so an append may be lost. The design
//! favors simplicity and availability over exact concurrent accounting.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    premium::PremiumRecord,
    usage::{QuotaStatus, UsageEvent},
};

pub use application::{
    config::QuotaConfig,
    entitlements::Entitlements,
    ledger::UsageLedger,
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, KeyValueStore, StoreError},
};

pub use infrastructure::{clock::SystemClock, memory::MemoryStore};

#[cfg(feature = "redis-store")]
pub use infrastructure::redis_store::{RedisStore, RedisStoreConfig};

#[cfg(any(test, feature = "test-helpers"))]
pub use infrastructure::mocks::{FailingStore, MockClock};
