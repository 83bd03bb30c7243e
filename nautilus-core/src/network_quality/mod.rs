//! Network quality — discrete classification of platform connectivity.
//!
//! Everything downstream (bandwidth parameters, optimisation config,
//! Lite Mode) keys off [`ConnectionQuality`]. The mapping is fixed and
//! deterministic; see [`classify_quality`].

pub mod monitor;
pub mod types;

pub use monitor::{classify_quality, NetworkQualityMonitor, SubscriptionId};
pub use types::{
    ConnectionQuality, ConnectionSignal, EffectiveType, NetworkStatus, ParseQualityError,
};
