//! Lite Mode — adaptive reduction toggles with user-override precedence.
//!
//! The controller aggregates network quality and memory pressure into a
//! [`LiteModeConfig`]. User intent always wins over auto-detection.

pub mod controller;
pub mod types;

pub use controller::{detect_slow, LiteModeController};
pub use types::{
    LiteModeConfig, LiteModeEvent, LiteModeState, MotionSink, NoopMotionSink, UserOverride,
};
