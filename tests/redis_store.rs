//! Integration tests for the Redis adapter.
//!
//! These tests require a Redis instance at `redis://127.0.0.1/`.
//! Tests are ignored by default - run with
//! `cargo test --features redis-store --test redis_store -- --ignored`

#![cfg(feature = "redis-store")]

use quota_guard::{KeyValueStore, RedisStore, RedisStoreConfig, SystemClock, UsageLedger};
use std::sync::Arc;
use std::time::Duration;

/// Check if Redis is available before running tests
async fn redis_available() -> bool {
    RedisStore::connect("redis://127.0.0.1/").await.is_ok()
}

/// Create a test store with a unique prefix
async fn create_test_store(test_name: &str) -> RedisStore {
    let config = RedisStoreConfig {
        key_prefix: format!("test:{test_name}:"),
    };

    RedisStore::connect_with_config("redis://127.0.0.1/", config)
        .await
        .expect("Failed to connect to Redis")
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_redis_put_get_delete() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available at redis://127.0.0.1/");
        return;
    }

    let store = create_test_store("basic").await;

    store
        .put("k", "v".to_string(), None)
        .await
        .expect("put failed");
    assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

    store.delete("k").await.expect("delete failed");
    assert_eq!(store.get("k").await.unwrap(), None);

    // Deleting an absent key is not an error.
    store.delete("k").await.expect("second delete failed");
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_redis_ttl_expiration() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available");
        return;
    }

    let store = create_test_store("ttl").await;

    store
        .put("k", "v".to_string(), Some(Duration::from_secs(1)))
        .await
        .expect("put failed");
    assert!(store.get("k").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_redis_key_prefix_isolation() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available");
        return;
    }

    let store1 = create_test_store("prefix1").await;
    let store2 = create_test_store("prefix2").await;

    store1
        .put("k", "v".to_string(), None)
        .await
        .expect("put failed");

    assert_eq!(store2.get("k").await.unwrap(), None);

    store1.delete("k").await.expect("cleanup failed");
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_ledger_over_redis() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available");
        return;
    }

    let store = create_test_store("ledger").await;
    let ledger = UsageLedger::new(store.clone(), Arc::new(SystemClock::new()));
    let user = "redis-user";

    // Clean slate for reruns.
    store.delete(&format!("usage:{user}")).await.unwrap();
    store.delete(&format!("premium:{user}")).await.unwrap();

    for expected_remaining in [3u32, 2, 1] {
        let status = ledger.check_limit(user).await;
        assert!(status.allowed);
        assert_eq!(status.remaining, Some(expected_remaining));
        ledger.record_usage(user).await;
    }
    assert!(!ledger.check_limit(user).await.allowed);

    assert!(ledger.entitlements().grant(user).await);
    assert!(ledger.check_limit(user).await.is_premium);

    assert!(ledger.entitlements().revoke(user).await);
    assert!(!ledger.check_limit(user).await.allowed);

    store.delete(&format!("usage:{user}")).await.unwrap();
}
