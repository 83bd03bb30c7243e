//! Conformance: offline cache storage format.
//!
//! The browser build writes records to local storage under the same
//! keys; either side must be able to read what the other wrote.

use std::time::Duration;

use nautilus_core::constants::OFFLINE_CACHE_PREFIX;
use nautilus_core::offline::{KvStore, ManualClock, MemoryStore, OfflineCache, OfflineCacheRecord};
use serde_json::{json, Value};

/// Records live under `offline_cache_<key>`.
#[test]
fn conformance_namespace_prefix() {
    let mut cache = OfflineCache::new(MemoryStore::new(), ManualClock::new(0));
    cache.cache_data("crew/roster", &json!([]), None);
    assert_eq!(OFFLINE_CACHE_PREFIX, "offline_cache_");
    assert_eq!(
        cache.store().list_keys("").unwrap(),
        vec!["offline_cache_crew/roster".to_string()]
    );
}

/// Stored JSON uses `key`, `data`, `timestamp`, `expiresAt`.
#[test]
fn conformance_record_field_names() {
    let mut cache = OfflineCache::new(MemoryStore::new(), ManualClock::new(42));
    cache.cache_data("k", &json!({"a": 1}), Some(Duration::from_millis(8)));
    let raw = cache.store().get_item("offline_cache_k").unwrap().unwrap();
    let stored: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        stored,
        json!({"key": "k", "data": {"a": 1}, "timestamp": 42, "expiresAt": 50})
    );
}

/// A record written by the web shell without `expiresAt` is readable
/// and never expires.
#[test]
fn conformance_reads_record_without_expiry() {
    let mut store = MemoryStore::new();
    store
        .set_item(
            "offline_cache_legacy",
            r#"{"key":"legacy","data":{"ok":true},"timestamp":1}"#,
        )
        .unwrap();
    let mut cache = OfflineCache::new(store, ManualClock::new(9_999_999_999));
    assert_eq!(
        cache.get_cached_data::<Value>("legacy"),
        Some(json!({"ok": true}))
    );
}

/// Record JSON round-trips through the public type.
#[test]
fn conformance_record_type_matches_stored_json() {
    let record: OfflineCacheRecord =
        serde_json::from_str(r#"{"key":"a","data":null,"timestamp":3,"expiresAt":4}"#).unwrap();
    assert_eq!(record.expires_at, Some(4));
    assert!(record.is_expired(5));
    assert!(!record.is_expired(4));
}
