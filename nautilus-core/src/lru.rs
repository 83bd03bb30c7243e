//! Bounded key→value cache with least-recently-used eviction.
//!
//! Recency is tracked with a monotonically increasing access tick: the
//! map holds each value with its last tick, and a tick-ordered index
//! points back at the key. The smallest tick is always the LRU entry.
//!
//! Single-threaded by design of the callers; wrap in a lock if shared.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use tracing::debug;

use crate::errors::CoreError;

struct Slot<V> {
    value: V,
    tick: u64,
}

/// Hit/miss/eviction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LruStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl LruStats {
    /// Fraction of `get` calls that hit (0.0 when nothing was read).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache holding at most `max_size` entries.
pub struct LruCache<K, V> {
    entries: HashMap<K, Slot<V>>,
    order: BTreeMap<u64, K>,
    next_tick: u64,
    max_size: usize,
    stats: LruStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidCapacity` when `max_size == 0`.
    pub fn new(max_size: usize) -> Result<Self, CoreError> {
        if max_size == 0 {
            return Err(CoreError::InvalidCapacity(max_size));
        }
        Ok(Self {
            entries: HashMap::with_capacity(max_size),
            order: BTreeMap::new(),
            next_tick: 0,
            max_size,
            stats: LruStats::default(),
        })
    }

    fn bump(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    /// Look up `key`, promoting it to most-recently-used on a hit.
    ///
    /// A miss leaves recency order untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let old_tick = match self.entries.get(key) {
            Some(slot) => slot.tick,
            None => {
                self.stats.misses += 1;
                return None;
            }
        };
        let new_tick = self.bump();
        if let Some(owned) = self.order.remove(&old_tick) {
            self.order.insert(new_tick, owned);
        }
        self.stats.hits += 1;
        let slot = self.entries.get_mut(key)?;
        slot.tick = new_tick;
        Some(&slot.value)
    }

    /// Read without touching recency or counters.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|slot| &slot.value)
    }

    /// Insert or replace `key`, making it most-recently-used.
    ///
    /// Inserting a new key into a full cache evicts exactly one entry,
    /// the least recently used, and returns it.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        let tick = self.bump();
        if let Some(slot) = self.entries.get_mut(&key) {
            let old_tick = slot.tick;
            slot.value = value;
            slot.tick = tick;
            self.order.remove(&old_tick);
            self.order.insert(tick, key);
            return None;
        }

        let evicted = if self.entries.len() >= self.max_size {
            self.evict_lru()
        } else {
            None
        };

        self.order.insert(tick, key.clone());
        self.entries.insert(key, Slot { value, tick });
        evicted
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let (_, key) = self.order.pop_first()?;
        let slot = self.entries.remove(&key)?;
        self.stats.evictions += 1;
        debug!(size = self.entries.len(), "lru eviction");
        Some((key, slot.value))
    }

    /// Membership test. Does not alter recency.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Remove `key`, returning its value if present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.entries.remove(key)?;
        self.order.remove(&slot.tick);
        Some(slot.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn stats(&self) -> LruStats {
        self.stats
    }

    /// Keys from least to most recently used.
    pub fn keys_lru_order(&self) -> impl Iterator<Item = &K> {
        self.order.values()
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.entries.len())
            .field("max_size", &self.max_size)
            .field("stats", &self.stats)
            .finish()
    }
}
