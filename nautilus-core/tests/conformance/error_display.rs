//! Conformance: error display stability.
//!
//! Error text is logged by native hosts and surfaced by the web shell;
//! drift breaks log queries and UI string matching.

use nautilus_core::{CoreError, StorageError};

/// Every CoreError variant produces the expected display format.
#[test]
fn conformance_core_error_display_format_stable() {
    let cases: Vec<(CoreError, &str)> = vec![
        (
            CoreError::InvalidCapacity(0),
            "Invalid capacity: 0 (must be at least 1)",
        ),
        (
            CoreError::Storage(StorageError::Io("disk full".into())),
            "Storage error: storage io: disk full",
        ),
        (
            CoreError::Serialization("trailing comma".into()),
            "Serialization error: trailing comma",
        ),
    ];

    for (error, expected) in &cases {
        assert_eq!(error.to_string(), *expected, "CoreError display drift detected");
    }
}

/// StorageError variants carry their context in the message.
#[test]
fn conformance_storage_error_display_format_stable() {
    assert_eq!(
        StorageError::QuotaExceeded {
            needed: 10,
            available: 2
        }
        .to_string(),
        "quota exceeded: 10 bytes needed, 2 available"
    );
    assert_eq!(
        StorageError::Unavailable("private mode".into()).to_string(),
        "storage unavailable: private mode"
    );
}

/// Errors MUST implement std::error::Error and be Send + Sync.
#[test]
fn conformance_errors_are_std_errors() {
    fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
    assert_send_sync::<CoreError>();
    assert_send_sync::<StorageError>();
}

/// io::Error converts into StorageError::Io.
#[test]
fn conformance_io_error_maps_to_storage_io() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err = StorageError::from(io);
    assert!(
        err.to_string().starts_with("storage io:"),
        "io error should map to Io, got: {err}"
    );
}
