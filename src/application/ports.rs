//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the
//! application layer needs. Infrastructure adapters implement these ports.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the key-value collaborator.
///
/// The application layer does not distinguish transport failures from
/// malformed stored data; both collapse into this one error kind, and both
/// are handled by per-capability fallback values rather than propagated to
/// callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored value could not be decoded as the expected shape.
    #[error("malformed value under {key}: {reason}")]
    Malformed {
        /// Key whose value failed to decode.
        key: String,
        /// Decoder error text.
        reason: String,
    },
}

impl StoreError {
    /// Wrap any displayable backend error.
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Port for obtaining wall-clock time.
///
/// Wall clock rather than a monotonic instant: entitlement windows must
/// survive process restarts, so every comparison in this crate is on epoch
/// time. Infrastructure provides `SystemClock` for production and
/// `MockClock` for tests.
pub trait Clock: Send + Sync + Debug {
    /// Current wall-clock time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

impl Clock for Arc<dyn Clock> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Port for the external key-value store.
///
/// Values are raw JSON text; (de)serialization lives in the application
/// layer so that malformed data and transport failures surface uniformly
/// as [`StoreError`]. TTLs are relative and enforced by the store itself,
/// not by this crate.
///
/// Implementations must be thread-safe (`Send + Sync`) as they are called
/// concurrently from multiple requests.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, optionally asking the store to drop the
    /// key once `ttl` has elapsed.
    async fn put(&self, key: &str, value: String, ttl: Option<Duration>)
        -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Blanket implementation for `Arc<S>`, allowing a shared store handle to be
/// passed directly wherever `impl KeyValueStore` is expected.
#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        (**self).put(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}
