//! Nautilus App Core — shared runtime for Nautilus One native hosts.
//!
//! Wires the policy in `nautilus-core` to real storage, real time and
//! async transport. Shells (desktop, mobile) construct one
//! [`PerformanceService`] at startup and feed it connectivity and memory
//! signals; the service hands back immutable snapshots.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `AppConfig` JSON loading and validation |
//! | [`error`] | `AppError`, `FetchError` |
//! | [`fetch`] | Async fetch-with-fallback over the offline cache |
//! | [`file_store`] | Durable JSON-file `KvStore` |
//! | [`logging`] | `tracing-subscriber` setup |
//! | [`service`] | `PerformanceService` composition root |

pub mod config;
pub mod error;
pub mod fetch;
pub mod file_store;
pub mod logging;
pub mod service;

pub use config::{AppConfig, CacheSettings};
pub use error::{AppError, FetchError};
pub use fetch::{fetch_with_fallback, FetchOutcome};
pub use file_store::FileStore;
pub use service::{PerformanceService, PrefetchDecision, Snapshot, SyncReport};
