//! Optimization config — the per-observation snapshot the view layer reads.
//!
//! [`OptimizationConfig::derive`] is pure. A new snapshot replaces the
//! old one wholesale on every signal change; nothing mutates a snapshot
//! in place.

use serde::{Deserialize, Serialize};

use crate::bandwidth::BandwidthParams;
use crate::constants::{HIGH_HEAP_USAGE_RATIO, LOW_DEVICE_MEMORY_GB};
use crate::network_quality::{ConnectionQuality, NetworkStatus};

/// Best-effort memory pressure observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySignal {
    /// `navigator.deviceMemory` (GiB, coarse).
    pub device_memory_gb: Option<f64>,
    /// Used / limit ratio of the JS heap.
    pub heap_used_ratio: Option<f64>,
}

impl MemorySignal {
    pub fn with_device_memory(mut self, gb: f64) -> Self {
        self.device_memory_gb = Some(gb);
        self
    }

    pub fn with_heap_usage(mut self, ratio: f64) -> Self {
        self.heap_used_ratio = Some(ratio);
        self
    }

    /// Absent readings count as "not low".
    pub fn is_low_memory(&self) -> bool {
        let low_device = self
            .device_memory_gb
            .is_some_and(|gb| gb <= LOW_DEVICE_MEMORY_GB);
        let heap_pressure = self
            .heap_used_ratio
            .is_some_and(|r| r >= HIGH_HEAP_USAGE_RATIO);
        low_device || heap_pressure
    }
}

/// Reactive optimisation toggles and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationConfig {
    pub should_reduce_animations: bool,
    pub should_reduce_data: bool,
    pub should_lazy_load_images: bool,
    pub should_prefetch: bool,
    pub image_quality: u8,
    pub batch_size: u32,
    pub timeout_ms: u64,
    pub connection_quality: ConnectionQuality,
    pub is_low_memory: bool,
}

impl OptimizationConfig {
    pub fn derive(status: &NetworkStatus, memory: &MemorySignal) -> Self {
        let quality = status.quality;
        let is_low_memory = memory.is_low_memory();
        let params = BandwidthParams::for_quality(quality);
        let fast = matches!(quality, ConnectionQuality::Excellent | ConnectionQuality::Good);

        Self {
            should_reduce_animations: quality.is_slow() || is_low_memory,
            should_reduce_data: quality.is_slow() || status.save_data,
            should_lazy_load_images: quality != ConnectionQuality::Excellent,
            should_prefetch: fast && !is_low_memory && !status.save_data,
            image_quality: params.image_quality,
            batch_size: params.batch_size,
            timeout_ms: params.timeout_ms,
            connection_quality: quality,
            is_low_memory,
        }
    }
}
