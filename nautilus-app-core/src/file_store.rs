//! Durable `KvStore` backed by a single JSON file.
//!
//! The whole map is rewritten on every mutation: serialize to a sibling
//! temp file, then rename over the target. A crash mid-write leaves the
//! previous file intact. Batch removals rewrite the file once.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nautilus_core::offline::KvStore;
use nautilus_core::StorageError;
use tracing::{debug, warn};

/// JSON object file of string keys to string values.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
    writes: u64,
}

impl FileStore {
    /// Open `path`, creating parent directories as needed.
    ///
    /// A missing file is an empty store. A file that is not a JSON
    /// string map is logged and replaced on the next write, matching
    /// how corrupt cache records are treated as absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "store file unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = items.len(), "opened file store");
        Ok(Self { path, items, writes: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// File rewrites completed since open.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string(&self.items).map_err(|e| StorageError::Io(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        self.writes += 1;
        Ok(())
    }

    /// Apply a mutation and persist it, restoring the previous value if
    /// the write fails so memory never runs ahead of disk.
    fn commit(&mut self, key: &str, next: Option<String>) -> Result<(), StorageError> {
        let previous = match &next {
            Some(value) => self.items.insert(key.to_string(), value.clone()),
            None => self.items.remove(key),
        };
        if let Err(e) = self.persist() {
            match previous {
                Some(old) => self.items.insert(key.to_string(), old),
                None => self.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.commit(key, Some(value.to_string()))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.items.contains_key(key) {
            return Ok(());
        }
        self.commit(key, None)
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .items
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn remove_items(&mut self, keys: &[String]) -> Result<usize, StorageError> {
        let removed: Vec<(String, String)> = keys
            .iter()
            .filter_map(|k| self.items.remove_entry(k.as_str()))
            .collect();
        if removed.is_empty() {
            return Ok(0);
        }
        if let Err(e) = self.persist() {
            self.items.extend(removed);
            return Err(e);
        }
        debug!(path = %self.path.display(), removed = removed.len(), "batch removed");
        Ok(removed.len())
    }
}
