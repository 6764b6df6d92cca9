//! Failing store double for outage simulation.

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{KeyValueStore, StoreError};

/// A store whose every operation fails, simulating a collaborator outage.
///
/// Useful for asserting the fallback contracts: entitlement reads fail
/// closed, quota checks fail open, and writes report non-application.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl FailingStore {
    /// Create a new failing store.
    pub fn new() -> Self {
        Self
    }

    fn outage() -> StoreError {
        StoreError::Backend("simulated store outage".to_string())
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(Self::outage())
    }

    async fn put(
        &self,
        _key: &str,
        _value: String,
        _ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        Err(Self::outage())
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(Self::outage())
    }
}
