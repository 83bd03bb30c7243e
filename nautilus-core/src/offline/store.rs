//! Durable key-value store abstraction.
//!
//! The offline cache treats storage as a black box with four
//! operations. Browser local storage, a flat file or an embedded DB can
//! sit behind it; [`MemoryStore`] is the in-process adapter used by
//! tests and by hosts that do not need durability.

use std::collections::BTreeMap;

use crate::errors::StorageError;

/// Minimal string key-value store.
///
/// Writes are whole-value replacements. Concurrent writers to the same
/// key resolve as last-write-wins.
pub trait KvStore {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;

    /// Every key starting with `prefix`, in lexicographic order.
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Delete several values, returning how many were present.
    ///
    /// Adapters whose writes are expensive (one file rewrite per call)
    /// override this to commit the whole batch at once.
    fn remove_items(&mut self, keys: &[String]) -> Result<usize, StorageError> {
        let mut removed = 0;
        for key in keys {
            if self.get_item(key)?.is_some() {
                self.remove_item(key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        (**self).list_keys(prefix)
    }

    fn remove_items(&mut self, keys: &[String]) -> Result<usize, StorageError> {
        (**self).remove_items(keys)
    }
}

/// In-memory store with an optional byte quota.
///
/// The quota counts key and value bytes, mirroring how browsers bound
/// local storage, so quota-exceeded paths can be exercised without a
/// browser.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    used_bytes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once `quota_bytes` would be exceeded.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }
}

impl KvStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let existing = self
            .items
            .get(key)
            .map(|v| key.len() + v.len())
            .unwrap_or(0);
        let needed = key.len() + value.len();
        let projected = self.used_bytes - existing + needed;
        if let Some(quota) = self.quota_bytes {
            if projected > quota {
                return Err(StorageError::QuotaExceeded {
                    needed,
                    available: quota.saturating_sub(self.used_bytes - existing),
                });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        self.used_bytes = projected;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if let Some(v) = self.items.remove(key) {
            self.used_bytes -= key.len() + v.len();
        }
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .items
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
