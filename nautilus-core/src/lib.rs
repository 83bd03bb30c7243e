//! Nautilus Core — adaptive network and performance policy.
//!
//! This crate is the canonical source of the client-side optimisation
//! policy for Nautilus One: how connectivity is classified, which
//! parameters each class gets, when Lite Mode switches on, and how the
//! offline cache ages its records. The web shell consumes it through
//! `nautilus-policy-wasm`; native hosts through `nautilus-app-core`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`constants`] | Storage namespace, default TTL, thresholds |
//! | [`errors`] | `CoreError`, `StorageError` |
//! | [`network_quality`] | Signal → `ConnectionQuality`, observing monitor |
//! | [`lru`] | Bounded LRU cache |
//! | [`offline`] | TTL cache over `KvStore`, pending-sync queue |
//! | [`bandwidth`] | Quality → image/fetch parameters, URL rewriting |
//! | [`optimization`] | `OptimizationConfig` derivation |
//! | [`lite_mode`] | Lite Mode controller |
//!
//! # Execution model
//!
//! Everything here is synchronous and takes no locks. Time and storage
//! are injected. The stateful types are `Send` (given `Send` stores,
//! clocks and sinks), so hosts can move them to another thread or put
//! them behind one mutex; signal → config recomputation must stay
//! behind that single writer.

/// Shared constants.
pub mod constants;

/// Error types for nautilus-core operations.
pub mod errors;

/// Connection quality classification and monitoring.
pub mod network_quality;

/// Least-recently-used cache.
pub mod lru;

/// Offline cache with TTL and pending-sync queue.
pub mod offline;

/// Bandwidth-adaptive parameters for images and fetches.
pub mod bandwidth;

/// Reactive optimisation config.
pub mod optimization;

/// Lite Mode policy.
pub mod lite_mode;

pub use errors::{CoreError, StorageError};
pub use lru::{LruCache, LruStats};
pub use network_quality::{
    classify_quality, ConnectionQuality, ConnectionSignal, EffectiveType, NetworkQualityMonitor,
    NetworkStatus,
};
pub use optimization::{MemorySignal, OptimizationConfig};
