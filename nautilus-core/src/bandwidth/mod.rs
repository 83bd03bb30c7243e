//! Bandwidth optimizer — maps connection quality to concrete parameters.
//!
//! Pure data transforms only: no IO, no clocks. Hosts apply the
//! resulting URLs and fetch options themselves.

pub mod fetch_options;
pub mod image;
pub mod params;

pub use fetch_options::{optimized_fetch_options, CacheMode, FetchOptions};
pub use image::{optimized_image_url, ImageKey, ImageUrlOptimizer};
pub use params::{get_adaptive_quality, BandwidthLabel, BandwidthParams};
