//! Error types for nautilus-app-core.

use nautilus_core::CoreError;

/// Composition-root failure: bad config, unreadable files, core misuse.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration rejected by validation.
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem failure while loading config or opening storage.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON (config file or persisted store).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error surfaced by nautilus-core.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

/// The only failures fetch-with-fallback reports. Transport errors are
/// folded into `reason`; no platform error type escapes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Offline and nothing cached under the key.
    #[error("no connection and no cached data for {key}")]
    NoConnectionNoCache { key: String },

    /// Online, the live fetch failed or timed out, and nothing is cached.
    #[error("fetch failed for {key} with no cached fallback: {reason}")]
    Unavailable { key: String, reason: String },
}

impl FetchError {
    pub fn key(&self) -> &str {
        match self {
            FetchError::NoConnectionNoCache { key } | FetchError::Unavailable { key, .. } => key,
        }
    }
}
