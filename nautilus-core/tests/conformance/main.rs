//! Conformance harness — invariants shared with the web shell.
//!
//! Native hosts and the browser build read and write the same storage
//! records and show the same error text, so their formats are pinned
//! here.
//!
//! Invariant coverage:
//! - Offline cache record layout and namespace (storage_format)
//! - Error variant display stability (error_display)
//! - Serialized config field names consumed by the view layer (config_format)

mod config_format;
mod error_display;
mod storage_format;
