//! Offline cache — TTL records in a durable store plus a pending-sync set.
//!
//! Storage and time are injected ([`KvStore`], [`Clock`]) so expiry and
//! sweep logic is testable without a browser or filesystem.

pub mod cache;
pub mod clock;
pub mod store;
pub mod sync_queue;

pub use cache::{OfflineCache, OfflineCacheRecord, OfflineCacheStats};
pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{KvStore, MemoryStore};
pub use sync_queue::PendingSyncQueue;
