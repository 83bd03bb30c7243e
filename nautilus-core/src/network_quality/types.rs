//! Connection signal and quality types.
//!
//! These are plain values with no references or lifetimes so the wasm
//! surface can pass them across the JS boundary as strings and numbers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Effective connection type reported by the platform
/// (`navigator.connection.effectiveType` in browsers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectiveType {
    #[serde(rename = "4g")]
    FourG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "slow-2g")]
    Slow2G,
    Unknown,
}

impl EffectiveType {
    /// Parse a platform string. Unrecognised values map to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "4g" => EffectiveType::FourG,
            "3g" => EffectiveType::ThreeG,
            "2g" => EffectiveType::TwoG,
            "slow-2g" => EffectiveType::Slow2G,
            _ => EffectiveType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveType::FourG => "4g",
            EffectiveType::ThreeG => "3g",
            EffectiveType::TwoG => "2g",
            EffectiveType::Slow2G => "slow-2g",
            EffectiveType::Unknown => "unknown",
        }
    }

    /// `2g` and `slow-2g`, the tiers that trigger Lite Mode.
    pub fn is_slow(&self) -> bool {
        matches!(self, EffectiveType::TwoG | EffectiveType::Slow2G)
    }
}

impl fmt::Display for EffectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw connectivity observation, sampled on start and on every platform
/// change event. Never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectionSignal {
    /// Basic online/offline flag (`navigator.onLine`).
    pub online: bool,
    /// Declared connection type. `None` when the platform exposes no
    /// connection metadata at all.
    pub effective_type: Option<EffectiveType>,
    /// Estimated downlink bandwidth in megabits per second.
    pub downlink_mbps: Option<f64>,
    /// Estimated round-trip time in milliseconds.
    pub rtt_ms: Option<u32>,
    /// User requested reduced data usage.
    pub save_data: bool,
}

impl ConnectionSignal {
    /// Online with the given effective type and no other metadata.
    pub fn online(effective_type: EffectiveType) -> Self {
        Self {
            online: true,
            effective_type: Some(effective_type),
            ..Default::default()
        }
    }

    /// Offline. Connection metadata is irrelevant once offline.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_downlink(mut self, mbps: f64) -> Self {
        self.downlink_mbps = Some(mbps);
        self
    }

    pub fn with_rtt(mut self, rtt_ms: u32) -> Self {
        self.rtt_ms = Some(rtt_ms);
        self
    }

    pub fn with_save_data(mut self, save_data: bool) -> Self {
        self.save_data = save_data;
        self
    }
}

/// Discrete connection quality consumed by every other component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Offline,
}

impl ConnectionQuality {
    pub const ALL: [ConnectionQuality; 5] = [
        ConnectionQuality::Excellent,
        ConnectionQuality::Good,
        ConnectionQuality::Fair,
        ConnectionQuality::Poor,
        ConnectionQuality::Offline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionQuality::Excellent => "excellent",
            ConnectionQuality::Good => "good",
            ConnectionQuality::Fair => "fair",
            ConnectionQuality::Poor => "poor",
            ConnectionQuality::Offline => "offline",
        }
    }

    /// Fair, poor and offline: conditions where data and motion are reduced.
    pub fn is_slow(&self) -> bool {
        matches!(
            self,
            ConnectionQuality::Fair | ConnectionQuality::Poor | ConnectionQuality::Offline
        )
    }
}

impl fmt::Display for ConnectionQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`ConnectionQuality`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown connection quality: {0}")]
pub struct ParseQualityError(pub String);

impl FromStr for ConnectionQuality {
    type Err = ParseQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Ok(ConnectionQuality::Excellent),
            "good" => Ok(ConnectionQuality::Good),
            "fair" => Ok(ConnectionQuality::Fair),
            "poor" => Ok(ConnectionQuality::Poor),
            "offline" => Ok(ConnectionQuality::Offline),
            other => Err(ParseQualityError(other.to_string())),
        }
    }
}

/// Derived, continuously-updated network view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatus {
    pub quality: ConnectionQuality,
    pub online: bool,
    pub effective_type: EffectiveType,
    pub downlink_mbps: Option<f64>,
    pub rtt_ms: Option<u32>,
    pub save_data: bool,
}
