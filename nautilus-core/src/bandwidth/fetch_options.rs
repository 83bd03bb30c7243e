//! Adaptive fetch options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::params::BandwidthParams;
use crate::network_quality::ConnectionQuality;

/// Request cache directive, named after the Fetch API `cache` modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    Default,
    NoStore,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

/// Subset of fetch options the optimizer understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Abort deadline. Owned by the optimizer; caller values are replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_mode: Option<CacheMode>,
}

impl FetchOptions {
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = Some(mode);
        self
    }

    /// Case-insensitive header presence check.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
    }
}

/// Merge adaptive settings into caller options.
///
/// - `timeout_ms` always comes from the quality table.
/// - On fair/poor/offline a `Save-Data: on` header is added and the
///   cache mode defaults to `force-cache`, unless the caller set them.
/// - Every other caller field passes through untouched.
pub fn optimized_fetch_options(base: Option<FetchOptions>, quality: ConnectionQuality) -> FetchOptions {
    let mut options = base.unwrap_or_default();
    options.timeout_ms = Some(BandwidthParams::for_quality(quality).timeout_ms);
    if quality.is_slow() {
        if !options.has_header("save-data") {
            options.headers.insert("Save-Data".to_string(), "on".to_string());
        }
        if options.cache_mode.is_none() {
            options.cache_mode = Some(CacheMode::ForceCache);
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_base_gets_timeout_only_on_fast_links() {
        let opts = optimized_fetch_options(None, ConnectionQuality::Excellent);
        assert_eq!(opts.timeout_ms, Some(10_000));
        assert!(opts.headers.is_empty());
        assert_eq!(opts.cache_mode, None);
    }

    #[test]
    fn caller_fields_survive() {
        let base = FetchOptions::default()
            .with_method("POST")
            .with_header("Authorization", "Bearer t")
            .with_body("{}");
        let opts = optimized_fetch_options(Some(base), ConnectionQuality::Good);
        assert_eq!(opts.method.as_deref(), Some("POST"));
        assert_eq!(opts.body.as_deref(), Some("{}"));
        assert_eq!(opts.headers.get("Authorization").map(String::as_str), Some("Bearer t"));
    }

    #[test]
    fn optimizer_owns_timeout() {
        let base = FetchOptions {
            timeout_ms: Some(1),
            ..Default::default()
        };
        let opts = optimized_fetch_options(Some(base), ConnectionQuality::Poor);
        assert_eq!(opts.timeout_ms, Some(45_000));
    }

    #[test]
    fn slow_links_save_data_unless_caller_decided() {
        let opts = optimized_fetch_options(None, ConnectionQuality::Fair);
        assert_eq!(opts.headers.get("Save-Data").map(String::as_str), Some("on"));
        assert_eq!(opts.cache_mode, Some(CacheMode::ForceCache));

        let base = FetchOptions::default()
            .with_header("save-data", "off")
            .with_cache_mode(CacheMode::NoStore);
        let opts = optimized_fetch_options(Some(base), ConnectionQuality::Poor);
        assert_eq!(opts.headers.len(), 1);
        assert_eq!(opts.headers.get("save-data").map(String::as_str), Some("off"));
        assert_eq!(opts.cache_mode, Some(CacheMode::NoStore));
    }

    #[test]
    fn serializes_with_fetch_api_names() {
        let opts = FetchOptions::default().with_cache_mode(CacheMode::ForceCache);
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["cacheMode"], "force-cache");
    }
}
