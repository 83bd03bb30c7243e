//! Core constants — canonical values shared with the web shell.
//!
//! Storage keys written by the browser build and by native hosts must
//! agree, so the namespace prefix and default TTL live here and nowhere
//! else.

/// Key namespace prefix for offline cache records in the durable store.
pub const OFFLINE_CACHE_PREFIX: &str = "offline_cache_";

/// Default offline cache time-to-live (milliseconds): 24 hours.
pub const DEFAULT_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Default capacity of the image URL memoization cache (entries).
pub const DEFAULT_IMAGE_URL_CACHE_SIZE: usize = 256;

/// Query parameter carrying the requested image width.
pub const IMAGE_WIDTH_PARAM: &str = "w";

/// Query parameter carrying the requested image quality (0-100).
pub const IMAGE_QUALITY_PARAM: &str = "q";

/// Image quality used when the bandwidth label is not recognised.
pub const DEFAULT_IMAGE_QUALITY: u8 = 75;

/// Device memory (GiB) at or below which the device is memory constrained.
pub const LOW_DEVICE_MEMORY_GB: f64 = 2.0;

/// JS heap usage ratio at or above which the device is memory constrained.
pub const HIGH_HEAP_USAGE_RATIO: f64 = 0.9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_web_shell() {
        assert_eq!(OFFLINE_CACHE_PREFIX, "offline_cache_");
        assert_eq!(DEFAULT_TTL_MS, 86_400_000);
        assert_eq!(DEFAULT_IMAGE_QUALITY, 75);
        assert_eq!(IMAGE_WIDTH_PARAM, "w");
        assert_eq!(IMAGE_QUALITY_PARAM, "q");
    }

    #[test]
    fn memory_thresholds_are_sane() {
        assert!(LOW_DEVICE_MEMORY_GB > 0.0);
        assert!(HIGH_HEAP_USAGE_RATIO > 0.0 && HIGH_HEAP_USAGE_RATIO <= 1.0);
        assert!(DEFAULT_IMAGE_URL_CACHE_SIZE > 0);
    }
}
