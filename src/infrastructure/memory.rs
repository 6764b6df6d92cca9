//! In-memory key-value store.
//!
//! A `DashMap`-backed adapter that honors per-key TTLs against an injected
//! clock. This is the in-memory fake the application layer is designed to
//! be tested with, and it doubles as a single-process backend for
//! deployments without an external store.
//!
//! TTL handling is lazy: an expired entry is dropped the first time it is
//! read past its deadline, mirroring how a real store's eviction is
//! observed by this crate.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{Clock, KeyValueStore, StoreError};
use crate::infrastructure::clock::SystemClock;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    /// Epoch-millisecond deadline after which the entry is gone.
    expires_at: Option<u64>,
}

/// Thread-safe in-memory store with TTL support.
///
/// Cloning is cheap; all clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, StoredValue>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create a store that expires entries against the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a store that expires entries against the given clock.
    ///
    /// Pass the same `MockClock` used by the components under test to make
    /// TTL expiry deterministic.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Number of entries, including any not yet lazily expired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = self.clock.now_millis();

        // The map guard must be released before removing the key.
        let expired = match self.entries.get(key) {
            Some(entry) => match entry.expires_at {
                Some(deadline) if deadline <= now => true,
                _ => return Ok(Some(entry.value.clone())),
            },
            None => return Ok(None),
        };

        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let expires_at = ttl.map(|ttl| {
            self.clock
                .now_millis()
                .saturating_add(ttl.as_millis() as u64)
        });
        self.entries
            .insert(key.to_string(), StoredValue { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockClock;

    #[tokio::test]
    async fn put_get_delete_round() {
        let store = MemoryStore::new();

        assert_eq!(store.get("k").await.unwrap(), None);

        store.put("k", "v".to_string(), None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Deleting an absent key is fine.
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = MemoryStore::new();

        store.put("k", "v1".to_string(), None).await.unwrap();
        store.put("k", "v2".to_string(), None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn ttl_expires_entries_lazily() {
        let clock = Arc::new(MockClock::new(0));
        let store = MemoryStore::with_clock(clock.clone());

        store
            .put("k", "v".to_string(), Some(Duration::from_secs(10)))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(9));
        assert!(store.get("k").await.unwrap().is_some());
        assert_eq!(store.len(), 1);

        clock.advance(Duration::from_secs(1));
        assert_eq!(store.get("k").await.unwrap(), None);
        // The expired entry was dropped on read.
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rewrite_resets_ttl() {
        let clock = Arc::new(MockClock::new(0));
        let store = MemoryStore::with_clock(clock.clone());

        store
            .put("k", "v".to_string(), Some(Duration::from_secs(10)))
            .await
            .unwrap();
        clock.advance(Duration::from_secs(8));
        store
            .put("k", "v".to_string(), Some(Duration::from_secs(10)))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(8));
        assert!(store.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.put("k", "v".to_string(), None).await.unwrap();
        assert_eq!(clone.get("k").await.unwrap(), Some("v".to_string()));
    }
}
