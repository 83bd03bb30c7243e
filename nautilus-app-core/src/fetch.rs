//! Fetch-with-fallback: live data when possible, cached data otherwise.
//!
//! # Contract
//!
//! - Offline: serve the cached value (`is_from_cache = true`) or fail
//!   with [`FetchError::NoConnectionNoCache`]. The fetcher is not called.
//! - Online: run the fetcher under `timeout`. On success, write the
//!   value back to the cache (a failed write is logged, never surfaced)
//!   and serve it fresh. On failure or timeout, serve the cached value
//!   if one is live, else fail with [`FetchError::Unavailable`].

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use nautilus_core::offline::{Clock, KvStore, OfflineCache};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FetchError;

/// Fetched value plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome<T> {
    pub data: T,
    pub is_from_cache: bool,
}

impl<T> FetchOutcome<T> {
    pub fn fresh(data: T) -> Self {
        Self {
            data,
            is_from_cache: false,
        }
    }

    pub fn cached(data: T) -> Self {
        Self {
            data,
            is_from_cache: true,
        }
    }
}

pub async fn fetch_with_fallback<T, S, C, F, Fut, E>(
    cache: &mut OfflineCache<S, C>,
    online: bool,
    timeout: Duration,
    key: &str,
    fetcher: F,
) -> Result<FetchOutcome<T>, FetchError>
where
    T: Serialize + DeserializeOwned,
    S: KvStore,
    C: Clock,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    if !online {
        return match cache.get_cached_data::<T>(key) {
            Some(data) => {
                debug!(key, "offline, serving cached data");
                Ok(FetchOutcome::cached(data))
            }
            None => Err(FetchError::NoConnectionNoCache {
                key: key.to_string(),
            }),
        };
    }

    let reason = match tokio::time::timeout(timeout, fetcher()).await {
        Ok(Ok(data)) => {
            if !cache.cache_data(key, &data, None) {
                debug!(key, "fresh data not cached");
            }
            return Ok(FetchOutcome::fresh(data));
        }
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("timed out after {}ms", timeout.as_millis()),
    };

    match cache.get_cached_data::<T>(key) {
        Some(data) => {
            warn!(key, %reason, "live fetch failed, serving cached data");
            Ok(FetchOutcome::cached(data))
        }
        None => Err(FetchError::Unavailable {
            key: key.to_string(),
            reason,
        }),
    }
}
