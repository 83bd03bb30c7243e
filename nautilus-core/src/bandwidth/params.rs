//! Quality → operational parameter tables.
//!
//! Both tables are policy artifacts shared with the web shell. Change
//! them only together with the contract tests in
//! `tests/bandwidth_contracts.rs`.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_IMAGE_QUALITY;
use crate::network_quality::ConnectionQuality;

/// Coarse bandwidth label used by image components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandwidthLabel {
    Fast,
    Medium,
    Slow,
    Offline,
    Unknown,
}

impl BandwidthLabel {
    /// Parse a label. Anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fast" => BandwidthLabel::Fast,
            "medium" => BandwidthLabel::Medium,
            "slow" => BandwidthLabel::Slow,
            "offline" => BandwidthLabel::Offline,
            _ => BandwidthLabel::Unknown,
        }
    }

    /// Label for a connection quality (`poor` shares the offline tier).
    pub fn from_quality(quality: ConnectionQuality) -> Self {
        match quality {
            ConnectionQuality::Excellent => BandwidthLabel::Fast,
            ConnectionQuality::Good => BandwidthLabel::Medium,
            ConnectionQuality::Fair => BandwidthLabel::Slow,
            ConnectionQuality::Poor | ConnectionQuality::Offline => BandwidthLabel::Offline,
        }
    }

    pub fn image_quality(&self) -> u8 {
        match self {
            BandwidthLabel::Fast => 85,
            BandwidthLabel::Medium => 70,
            BandwidthLabel::Slow => 50,
            BandwidthLabel::Offline => 40,
            BandwidthLabel::Unknown => DEFAULT_IMAGE_QUALITY,
        }
    }
}

/// Image quality for a free-form bandwidth label.
///
/// `fast` 85, `medium` 70, `slow` 50, `offline` 40, anything else 75.
pub fn get_adaptive_quality(label: &str) -> u8 {
    BandwidthLabel::parse(label).image_quality()
}

/// Operational parameters for one connection quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandwidthParams {
    /// Image encode quality (0-100).
    pub image_quality: u8,
    /// Records per paginated fetch.
    pub batch_size: u32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl BandwidthParams {
    /// Fixed lookup. Identical input always yields identical output.
    pub fn for_quality(quality: ConnectionQuality) -> Self {
        let (batch_size, timeout_ms) = match quality {
            ConnectionQuality::Excellent => (50, 10_000),
            ConnectionQuality::Good => (20, 15_000),
            ConnectionQuality::Fair => (10, 30_000),
            ConnectionQuality::Poor | ConnectionQuality::Offline => (5, 45_000),
        };
        Self {
            image_quality: BandwidthLabel::from_quality(quality).image_quality(),
            batch_size,
            timeout_ms,
        }
    }
}
