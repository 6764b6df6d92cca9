//! Redis-backed key-value adapter.
//!
//! Lets multiple service instances share quota state through Redis. TTLs
//! map onto `SET key value EX seconds`, so retention is enforced by Redis
//! itself. Failure handling (fail open for checks, fail closed for
//! entitlement reads) lives in the application layer; this adapter only
//! reports [`StoreError`]s.
//!
//! Available behind the `redis-store` cargo feature.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use std::fmt;
use std::time::Duration;

use crate::application::ports::{KeyValueStore, StoreError};

/// Configuration for the Redis adapter.
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Prefix prepended to every key, isolating deployments sharing one
    /// Redis database. The quota namespaces (`usage:`, `premium:`) are
    /// applied after this prefix.
    pub key_prefix: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: String::new(),
        }
    }
}

/// Redis-backed store for shared quota state.
///
/// Cloning is cheap; `ConnectionManager` multiplexes and reconnects
/// internally.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Connect to Redis with the default configuration.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        Self::connect_with_config(url, RedisStoreConfig::default()).await
    }

    /// Connect to Redis with a custom configuration.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn connect_with_config(
        url: &str,
        config: RedisStoreConfig,
    ) -> Result<Self, RedisError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection, config })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn
            .get(self.key(key))
            .await
            .map_err(StoreError::backend)?;
        Ok(value)
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let key = self.key(key);
        match ttl {
            Some(ttl) => {
                // EX 0 is rejected by Redis; a sub-second TTL rounds up.
                let seconds = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(&key, value, seconds)
                    .await
                    .map_err(StoreError::backend)?;
            }
            None => {
                conn.set::<_, _, ()>(&key, value)
                    .await
                    .map_err(StoreError::backend)?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(self.key(key))
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }
}
