//! TTL-based offline cache over a [`KvStore`].
//!
//! Records are JSON documents stored under `<namespace><key>`. Reads
//! treat expired, corrupt and schema-mismatched records as misses and
//! delete them in the same call. Writes never fail loudly: a storage
//! error is logged and reported as `false`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::store::KvStore;
use super::sync_queue::PendingSyncQueue;
use crate::constants::{DEFAULT_TTL_MS, OFFLINE_CACHE_PREFIX};
use crate::errors::CoreError;

/// Stored form of a cached value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineCacheRecord {
    pub key: String,
    pub data: serde_json::Value,
    /// Write time, epoch milliseconds.
    pub timestamp: u64,
    /// Expiry, epoch milliseconds. `None` never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl OfflineCacheRecord {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        matches!(self.expires_at, Some(at) if at < now_ms)
    }
}

/// Counts reported by [`OfflineCache::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfflineCacheStats {
    pub entries: usize,
    pub pending_sync: usize,
}

/// Keyed, TTL-bounded persistence layer with a pending-sync queue.
pub struct OfflineCache<S, C> {
    store: S,
    clock: C,
    namespace: String,
    default_ttl: Duration,
    sync_queue: PendingSyncQueue,
}

impl<S: KvStore, C: Clock> OfflineCache<S, C> {
    /// Cache under the default `offline_cache_` namespace with a 24 h TTL.
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            namespace: OFFLINE_CACHE_PREFIX.to_string(),
            default_ttl: Duration::from_millis(DEFAULT_TTL_MS),
            sync_queue: PendingSyncQueue::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    fn write_record<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        data: &T,
        ttl: Duration,
    ) -> Result<(), CoreError> {
        let now = self.clock.now_ms();
        let record = OfflineCacheRecord {
            key: key.to_string(),
            data: serde_json::to_value(data)?,
            timestamp: now,
            expires_at: Some(now.saturating_add(ttl.as_millis() as u64)),
        };
        let encoded = serde_json::to_string(&record)?;
        let storage_key = self.storage_key(key);
        self.store.set_item(&storage_key, &encoded)?;
        Ok(())
    }

    /// Store `data` under `key` for `ttl` (default TTL when `None`).
    ///
    /// Returns `false` if the record could not be serialized or the
    /// store rejected the write (quota exceeded, storage disabled).
    pub fn cache_data<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        data: &T,
        ttl: Option<Duration>,
    ) -> bool {
        let ttl = ttl.unwrap_or(self.default_ttl);
        match self.write_record(key, data, ttl) {
            Ok(()) => {
                debug!(key, ttl_ms = ttl.as_millis() as u64, "cached");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "offline cache write failed");
                false
            }
        }
    }

    /// Read a live record, deleting it if expired or unreadable.
    fn read_record(&mut self, storage_key: &str) -> Option<OfflineCacheRecord> {
        let raw = match self.store.get_item(storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = storage_key, error = %e, "offline cache read failed");
                return None;
            }
        };
        let record = match serde_json::from_str::<OfflineCacheRecord>(&raw) {
            Ok(record) => record,
            Err(e) => {
                debug!(key = storage_key, error = %e, "dropping corrupt record");
                self.delete(storage_key);
                return None;
            }
        };
        if record.is_expired(self.clock.now_ms()) {
            debug!(key = storage_key, "dropping expired record");
            self.delete(storage_key);
            return None;
        }
        Some(record)
    }

    fn delete(&mut self, storage_key: &str) -> bool {
        match self.store.remove_item(storage_key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = storage_key, error = %e, "offline cache delete failed");
                false
            }
        }
    }

    /// Fetch `key` as `T`.
    ///
    /// `None` when absent, expired, corrupt, or not decodable as `T`.
    /// The last three cases also delete the stored record.
    pub fn get_cached_data<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let storage_key = self.storage_key(key);
        let record = self.read_record(&storage_key)?;
        match serde_json::from_value::<T>(record.data) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "dropping record with mismatched schema");
                self.delete(&storage_key);
                None
            }
        }
    }

    /// Whether a live (unexpired, parseable) record exists for `key`.
    pub fn contains(&mut self, key: &str) -> bool {
        let storage_key = self.storage_key(key);
        self.read_record(&storage_key).is_some()
    }

    /// Delete `key`. Returns `false` only if the store refused.
    pub fn remove(&mut self, key: &str) -> bool {
        let storage_key = self.storage_key(key);
        self.delete(&storage_key)
    }

    fn namespaced_keys(&self) -> Vec<String> {
        match self.store.list_keys(&self.namespace) {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "offline cache listing failed");
                Vec::new()
            }
        }
    }

    /// Delete a batch of storage keys through the store's batch path.
    ///
    /// On failure the count is recovered by checking which keys are gone,
    /// since a partial batch may have landed.
    fn delete_batch(&mut self, storage_keys: &[String]) -> usize {
        if storage_keys.is_empty() {
            return 0;
        }
        match self.store.remove_items(storage_keys) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(keys = storage_keys.len(), error = %e, "offline cache batch delete failed");
                storage_keys
                    .iter()
                    .filter(|k| matches!(self.store.get_item(k), Ok(None)))
                    .count()
            }
        }
    }

    /// Delete every expired or unparseable record in the namespace.
    ///
    /// Stale keys are collected first and removed in one batch, so a
    /// file-backed store is rewritten once per sweep. Returns the number
    /// of records removed.
    pub fn clear_expired_cache(&mut self) -> usize {
        let now = self.clock.now_ms();
        let stale: Vec<String> = self
            .namespaced_keys()
            .into_iter()
            .filter(|storage_key| match self.store.get_item(storage_key) {
                Ok(Some(raw)) => match serde_json::from_str::<OfflineCacheRecord>(&raw) {
                    Ok(record) => record.is_expired(now),
                    Err(_) => true,
                },
                Ok(None) => false,
                Err(e) => {
                    warn!(key = %storage_key, error = %e, "skipping unreadable key");
                    false
                }
            })
            .collect();
        let removed = self.delete_batch(&stale);
        if removed > 0 {
            info!(removed, "swept expired offline cache records");
        }
        removed
    }

    /// Delete every record in the namespace. Returns the count removed.
    pub fn clear_all(&mut self) -> usize {
        let keys = self.namespaced_keys();
        self.delete_batch(&keys)
    }

    /// Caller-facing keys currently stored, expired ones included.
    pub fn keys(&self) -> Vec<String> {
        self.namespaced_keys()
            .into_iter()
            .filter_map(|k| k.strip_prefix(self.namespace.as_str()).map(str::to_string))
            .collect()
    }

    /// Mark `key` as written offline and awaiting sync.
    pub fn add_to_sync_queue(&mut self, key: &str) {
        if self.sync_queue.insert(key) {
            debug!(key, pending = self.sync_queue.len(), "queued for sync");
        }
    }

    pub fn remove_from_sync_queue(&mut self, key: &str) {
        if self.sync_queue.remove(key) {
            debug!(key, pending = self.sync_queue.len(), "sync complete");
        }
    }

    pub fn is_pending_sync(&self, key: &str) -> bool {
        self.sync_queue.contains(key)
    }

    /// Pending keys, oldest first.
    pub fn pending_sync(&self) -> Vec<String> {
        self.sync_queue.to_vec()
    }

    pub fn stats(&self) -> OfflineCacheStats {
        OfflineCacheStats {
            entries: self.namespaced_keys().len(),
            pending_sync: self.sync_queue.len(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
