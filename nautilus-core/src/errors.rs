//! Error types for nautilus-core.
//!
//! Every failure inside the core is either absorbed locally (storage
//! errors surface as `false`/`None` to callers of the offline cache) or
//! reported as one of these enums. No platform error type leaks through.

/// Unified error type for core configuration and cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A bounded cache was configured with zero capacity.
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// The durable key-value store rejected an operation.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A record could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

/// Failure reported by a [`crate::offline::KvStore`] adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The write would exceed the store's quota.
    #[error("quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// The store is disabled or cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backing medium failed (filesystem, embedded DB).
    #[error("storage io: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_format() {
        assert_eq!(
            CoreError::InvalidCapacity(0).to_string(),
            "Invalid capacity: 0 (must be at least 1)"
        );
        let err = CoreError::from(StorageError::Unavailable("disabled".into()));
        assert_eq!(err.to_string(), "Storage error: storage unavailable: disabled");
    }

    #[test]
    fn quota_error_reports_sizes() {
        let err = StorageError::QuotaExceeded {
            needed: 120,
            available: 64,
        };
        assert_eq!(
            err.to_string(),
            "quota exceeded: 120 bytes needed, 64 available"
        );
    }

    #[test]
    fn serde_error_converts_to_serialization() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = CoreError::from(parse);
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
        assert_send_sync::<StorageError>();
    }
}
