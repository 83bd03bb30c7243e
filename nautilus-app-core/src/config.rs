//! Host configuration.
//!
//! Loaded from JSON. Missing fields take defaults; unknown fields are
//! rejected so typos fail loudly at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use nautilus_core::constants::{DEFAULT_IMAGE_URL_CACHE_SIZE, DEFAULT_TTL_MS, OFFLINE_CACHE_PREFIX};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Offline cache and image memoization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    /// Key prefix for offline cache records.
    pub namespace: String,
    /// TTL applied when `cache_data` is called without one.
    pub default_ttl_secs: u64,
    /// Capacity of the optimized image URL memo.
    pub image_url_cache_size: usize,
    /// JSON file backing the offline cache. `None` keeps it in memory.
    pub storage_path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            namespace: OFFLINE_CACHE_PREFIX.to_string(),
            default_ttl_secs: DEFAULT_TTL_MS / 1000,
            image_url_cache_size: DEFAULT_IMAGE_URL_CACHE_SIZE,
            storage_path: None,
        }
    }
}

impl CacheSettings {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

/// Top-level host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub cache: CacheSettings,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let config: AppConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.cache.namespace.is_empty() {
            return Err(AppError::Config("cache.namespace must not be empty".into()));
        }
        if self.cache.image_url_cache_size == 0 {
            return Err(AppError::Config(
                "cache.image_url_cache_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.cache.namespace = namespace.into();
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.cache.default_ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_image_url_cache_size(mut self, size: usize) -> Self {
        self.cache.image_url_cache_size = size;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache.storage_path = Some(path.into());
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}
