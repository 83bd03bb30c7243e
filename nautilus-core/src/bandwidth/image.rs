//! Bandwidth-adaptive image URL rewriting.
//!
//! The rewrite is a pure function of `(url, width, quality)` so its
//! result can be memoized; [`ImageUrlOptimizer`] does exactly that with
//! an [`LruCache`].

use url::form_urlencoded;

use super::params::BandwidthParams;
use crate::constants::{IMAGE_QUALITY_PARAM, IMAGE_WIDTH_PARAM};
use crate::errors::CoreError;
use crate::lru::LruCache;
use crate::network_quality::ConnectionQuality;

/// Rewrite `url` so it requests `width` (if given) at the image quality
/// for `quality`.
///
/// Existing `w`/`q` parameters are replaced; every other parameter keeps
/// its position and the fragment is preserved. `data:` and `blob:` URLs
/// are returned unchanged.
pub fn optimized_image_url(url: &str, width: Option<u32>, quality: ConnectionQuality) -> String {
    if url.is_empty() || url.starts_with("data:") || url.starts_with("blob:") {
        return url.to_string();
    }

    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (url, None),
    };
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, query),
        None => (without_fragment, ""),
    };

    let image_quality = BandwidthParams::for_quality(quality).image_quality;
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        let replaced = name == IMAGE_QUALITY_PARAM || (width.is_some() && name == IMAGE_WIDTH_PARAM);
        if !replaced {
            serializer.append_pair(&name, &value);
        }
    }
    if let Some(w) = width {
        serializer.append_pair(IMAGE_WIDTH_PARAM, &w.to_string());
    }
    serializer.append_pair(IMAGE_QUALITY_PARAM, &image_quality.to_string());

    let mut out = format!("{base}?{}", serializer.finish());
    if let Some(frag) = fragment {
        out.push('#');
        out.push_str(frag);
    }
    out
}

/// Memoization key: url, requested width, connection quality.
pub type ImageKey = (String, Option<u32>, ConnectionQuality);

/// Memoizing wrapper around [`optimized_image_url`].
#[derive(Debug)]
pub struct ImageUrlOptimizer {
    cache: LruCache<ImageKey, String>,
}

impl ImageUrlOptimizer {
    /// # Errors
    /// `CoreError::InvalidCapacity` when `capacity == 0`.
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        Ok(Self {
            cache: LruCache::new(capacity)?,
        })
    }

    pub fn optimize(&mut self, url: &str, width: Option<u32>, quality: ConnectionQuality) -> String {
        let key = (url.to_string(), width, quality);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let rewritten = optimized_image_url(url, width, quality);
        self.cache.set(key, rewritten.clone());
        rewritten
    }

    pub fn cache(&self) -> &LruCache<ImageKey, String> {
        &self.cache
    }
}
