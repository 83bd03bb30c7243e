//! Pending write-back queue.
//!
//! Keys written while offline wait here until connectivity returns.
//! The queue is an insertion-ordered set: inserting a present key is a
//! no-op, and insert, membership and removal are O(1) amortized.
//!
//! Removal is lazy. Each live key carries the generation it was
//! inserted with; order entries whose generation no longer matches are
//! tombstones, skipped on iteration and dropped on compaction.

use std::collections::{HashMap, VecDeque};

/// De-duplicated, insertion-ordered set of keys awaiting sync.
#[derive(Debug, Default, Clone)]
pub struct PendingSyncQueue {
    live: HashMap<String, u64>,
    order: VecDeque<(u64, String)>,
    next_generation: u64,
}

impl PendingSyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key`. Returns `false` if it was already pending.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.live.contains_key(key) {
            return false;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.live.insert(key.to_string(), generation);
        self.order.push_back((generation, key.to_string()));
        true
    }

    /// Remove `key`. Returns `false` if it was not pending.
    pub fn remove(&mut self, key: &str) -> bool {
        if self.live.remove(key).is_none() {
            return false;
        }
        self.maybe_compact();
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.live.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
        self.order.clear();
    }

    /// Pending keys, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|(generation, key)| self.live.get(key) == Some(generation))
            .map(|(_, key)| key.as_str())
    }

    /// Snapshot of pending keys, oldest first.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    // Tombstones may make up at most half of the order buffer.
    fn maybe_compact(&mut self) {
        if self.order.len() > 2 * self.live.len() + 8 {
            let live = &self.live;
            self.order
                .retain(|(generation, key)| live.get(key) == Some(generation));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_deduplicated() {
        let mut q = PendingSyncQueue::new();
        assert!(q.insert("a"));
        assert!(!q.insert("a"));
        assert_eq!(q.len(), 1);
        assert_eq!(q.to_vec(), vec!["a"]);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut q = PendingSyncQueue::new();
        q.insert("c");
        q.insert("a");
        q.insert("b");
        assert_eq!(q.to_vec(), vec!["c", "a", "b"]);
    }

    #[test]
    fn remove_then_reinsert_moves_to_back() {
        let mut q = PendingSyncQueue::new();
        q.insert("a");
        q.insert("b");
        assert!(q.remove("a"));
        assert!(!q.remove("a"));
        q.insert("a");
        assert_eq!(q.to_vec(), vec!["b", "a"]);
        assert!(q.contains("a"));
    }

    #[test]
    fn compaction_drops_tombstones() {
        let mut q = PendingSyncQueue::new();
        for i in 0..100 {
            q.insert(&format!("k{i}"));
        }
        for i in 0..99 {
            q.remove(&format!("k{i}"));
        }
        assert_eq!(q.len(), 1);
        assert!(q.order.len() <= 2 * q.len() + 8);
        assert_eq!(q.to_vec(), vec!["k99"]);
    }

    #[test]
    fn clear_empties_queue() {
        let mut q = PendingSyncQueue::new();
        q.insert("a");
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.iter().count(), 0);
    }
}
