//! `PerformanceService` — the composition root native hosts embed.
//!
//! Owns the quality monitor, the offline cache, the image URL memo and
//! the Lite Mode controller, and recomputes every derived config
//! synchronously on each observed signal.
//!
//! # Contract
//!
//! - `&mut self` on every mutating call is the single-writer discipline:
//!   hosts that share a service across tasks wrap it in one mutex or
//!   actor, and each observation is fully applied before the next. The
//!   service is `Send` whenever its store, clock and motion sink are.
//! - Prefetch is skipped whenever either the optimisation config or
//!   Lite Mode disables it; each route is scheduled at most once.
//! - Storage and transport failures never escape as panics; see
//!   [`crate::fetch`] for the fetch error surface.

use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use nautilus_core::bandwidth::{optimized_fetch_options, FetchOptions, ImageUrlOptimizer};
use nautilus_core::lite_mode::{LiteModeConfig, LiteModeController, LiteModeEvent, MotionSink};
use nautilus_core::offline::{Clock, KvStore, OfflineCache, SystemClock};
use nautilus_core::{
    ConnectionQuality, ConnectionSignal, MemorySignal, NetworkQualityMonitor, NetworkStatus,
    OptimizationConfig,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, FetchError};
use crate::fetch::{self, FetchOutcome};
use crate::file_store::FileStore;

/// Derived state after one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub optimization: OptimizationConfig,
    pub lite_mode: LiteModeConfig,
    /// Set only on the observation that flipped auto Lite Mode.
    pub event: Option<LiteModeEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefetchDecision {
    /// First request for this route under a prefetch-friendly config.
    Scheduled,
    /// Already scheduled earlier in this session.
    AlreadyPrefetched,
    /// Prefetch is disabled by network quality, memory or Lite Mode.
    Skipped,
}

/// Outcome of replaying the pending-sync queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub synced: Vec<String>,
    pub failed: Vec<String>,
    /// True when the flush was not attempted because the host is offline.
    pub deferred: bool,
}

pub struct PerformanceService<S, C, M> {
    monitor: NetworkQualityMonitor,
    memory: MemorySignal,
    optimization: OptimizationConfig,
    lite_mode: LiteModeController<M>,
    cache: OfflineCache<S, C>,
    images: ImageUrlOptimizer,
    prefetched: HashSet<String>,
}

impl<S: KvStore, C: Clock, M: MotionSink> PerformanceService<S, C, M> {
    /// Build a service over `store`. Expired records are swept once here.
    ///
    /// The initial status is derived from an empty signal (offline,
    /// unknown type) so nothing is prefetched until the host reports
    /// real connectivity through [`Self::on_connection_change`].
    pub fn new(config: &AppConfig, store: S, clock: C, motion_sink: M) -> Result<Self, AppError> {
        config.validate()?;
        let monitor = NetworkQualityMonitor::new(&ConnectionSignal::default());
        let memory = MemorySignal::default();
        let optimization = OptimizationConfig::derive(monitor.status(), &memory);
        let mut cache = OfflineCache::new(store, clock)
            .with_namespace(config.cache.namespace.clone())
            .with_default_ttl(config.cache.default_ttl());
        let swept = cache.clear_expired_cache();
        debug!(swept, namespace = %config.cache.namespace, "performance service ready");
        Ok(Self {
            monitor,
            memory,
            optimization,
            lite_mode: LiteModeController::new(motion_sink),
            cache,
            images: ImageUrlOptimizer::new(config.cache.image_url_cache_size)?,
            prefetched: HashSet::new(),
        })
    }

    fn recompute(&mut self) -> Snapshot {
        let status = self.monitor.status().clone();
        self.optimization = OptimizationConfig::derive(&status, &self.memory);
        let event = self.lite_mode.on_signal(&status, &self.memory);
        Snapshot {
            optimization: self.optimization,
            lite_mode: self.lite_mode.config(),
            event,
        }
    }

    pub fn on_connection_change(&mut self, signal: &ConnectionSignal) -> Snapshot {
        self.monitor.observe(signal);
        self.recompute()
    }

    pub fn on_memory_change(&mut self, memory: MemorySignal) -> Snapshot {
        self.memory = memory;
        self.recompute()
    }

    pub fn toggle_lite_mode(&mut self, enabled: Option<bool>) -> LiteModeConfig {
        self.lite_mode.toggle_lite_mode(enabled)
    }

    /// Hand Lite Mode back to auto-detection. Clearing while the link is
    /// still slow re-enters auto Lite Mode and reports `AutoActivated`.
    pub fn clear_lite_mode_override(&mut self) -> Snapshot {
        let event = self.lite_mode.clear_override();
        Snapshot {
            optimization: self.optimization,
            lite_mode: self.lite_mode.config(),
            event,
        }
    }

    pub fn optimization(&self) -> OptimizationConfig {
        self.optimization
    }

    pub fn lite_mode(&self) -> &LiteModeController<M> {
        &self.lite_mode
    }

    pub fn network_status(&self) -> &NetworkStatus {
        self.monitor.status()
    }

    pub fn monitor_mut(&mut self) -> &mut NetworkQualityMonitor {
        &mut self.monitor
    }

    pub fn cache(&self) -> &OfflineCache<S, C> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut OfflineCache<S, C> {
        &mut self.cache
    }

    pub fn prefetch_route(&mut self, route: &str) -> PrefetchDecision {
        if !self.optimization.should_prefetch || self.lite_mode.config().disable_prefetch {
            debug!(route, "prefetch skipped");
            return PrefetchDecision::Skipped;
        }
        if self.prefetched.insert(route.to_string()) {
            PrefetchDecision::Scheduled
        } else {
            PrefetchDecision::AlreadyPrefetched
        }
    }

    pub fn optimized_fetch_options(&self, base: Option<FetchOptions>) -> FetchOptions {
        optimized_fetch_options(base, self.monitor.quality())
    }

    /// Quality used for image URLs. Lite Mode's image reduction pins it
    /// to the lowest tier regardless of the measured link.
    fn image_quality_tier(&self) -> ConnectionQuality {
        if self.lite_mode.config().reduce_image_quality {
            ConnectionQuality::Poor
        } else {
            self.monitor.quality()
        }
    }

    pub fn optimized_image_url(&mut self, url: &str, width: Option<u32>) -> String {
        let quality = self.image_quality_tier();
        self.images.optimize(url, width, quality)
    }

    /// Fetch `key` through `fetcher` with the offline fallback policy.
    ///
    /// The live call is bounded by the current quality's timeout.
    pub async fn fetch_with_fallback<T, F, Fut, E>(
        &mut self,
        key: &str,
        fetcher: F,
    ) -> Result<FetchOutcome<T>, FetchError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let online = self.monitor.is_online();
        let timeout = Duration::from_millis(self.optimization.timeout_ms);
        fetch::fetch_with_fallback(&mut self.cache, online, timeout, key, fetcher).await
    }

    /// Record a local write and queue it for write-back.
    pub fn save_for_sync<T: Serialize + ?Sized>(&mut self, key: &str, data: &T) -> bool {
        let stored = self.cache.cache_data(key, data, None);
        self.cache.add_to_sync_queue(key);
        stored
    }

    /// Replay queued keys through `sync` once online.
    ///
    /// Every key is attempted; successes leave the queue, failures stay
    /// for the next flush.
    pub async fn flush_sync_queue<F, Fut, E>(&mut self, mut sync: F) -> SyncReport
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        if !self.monitor.is_online() {
            debug!(pending = self.cache.stats().pending_sync, "offline, sync deferred");
            return SyncReport {
                deferred: true,
                ..SyncReport::default()
            };
        }
        let mut report = SyncReport::default();
        for key in self.cache.pending_sync() {
            match sync(key.clone()).await {
                Ok(()) => {
                    self.cache.remove_from_sync_queue(&key);
                    report.synced.push(key);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "sync failed, keeping queued");
                    report.failed.push(key);
                }
            }
        }
        if !report.synced.is_empty() || !report.failed.is_empty() {
            info!(
                synced = report.synced.len(),
                failed = report.failed.len(),
                "sync queue flushed"
            );
        }
        report
    }
}

impl<M: MotionSink> PerformanceService<FileStore, SystemClock, M> {
    /// Durable service over the configured `storage_path`.
    pub fn open(config: &AppConfig, motion_sink: M) -> Result<Self, AppError> {
        let path: PathBuf = config
            .cache
            .storage_path
            .clone()
            .ok_or_else(|| AppError::Config("cache.storage_path is required".into()))?;
        let store = FileStore::open(path).map_err(nautilus_core::CoreError::from)?;
        Self::new(config, store, SystemClock, motion_sink)
    }
}

impl<S, C, M: MotionSink> std::fmt::Debug for PerformanceService<S, C, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceService")
            .field("status", self.monitor.status())
            .field("optimization", &self.optimization)
            .field("lite_mode", &self.lite_mode.config())
            .field("prefetched", &self.prefetched.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nautilus_core::lite_mode::NoopMotionSink;
    use nautilus_core::offline::{ManualClock, MemoryStore};
    use nautilus_core::EffectiveType;

    type TestService = PerformanceService<MemoryStore, ManualClock, NoopMotionSink>;

    fn service() -> TestService {
        PerformanceService::new(
            &AppConfig::default(),
            MemoryStore::new(),
            ManualClock::new(0),
            NoopMotionSink,
        )
        .unwrap()
    }

    #[test]
    fn starts_conservative_until_first_signal() {
        let mut svc = service();
        assert_eq!(svc.network_status().quality, ConnectionQuality::Offline);
        assert_eq!(svc.prefetch_route("/crew"), PrefetchDecision::Skipped);
    }

    #[test]
    fn prefetch_scheduled_once_on_fast_link() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::FourG));
        assert_eq!(svc.prefetch_route("/crew"), PrefetchDecision::Scheduled);
        assert_eq!(svc.prefetch_route("/crew"), PrefetchDecision::AlreadyPrefetched);
        assert_eq!(svc.prefetch_route("/vessels"), PrefetchDecision::Scheduled);
    }

    #[test]
    fn user_lite_mode_blocks_prefetch_on_fast_link() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::FourG));
        svc.toggle_lite_mode(Some(true));
        assert_eq!(svc.prefetch_route("/crew"), PrefetchDecision::Skipped);
        svc.toggle_lite_mode(Some(false));
        assert_eq!(svc.prefetch_route("/crew"), PrefetchDecision::Scheduled);
    }

    #[test]
    fn low_memory_disables_prefetch() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::ThreeG));
        let snap = svc.on_memory_change(MemorySignal::default().with_device_memory(1.0));
        assert!(!snap.optimization.should_prefetch);
        assert!(snap.optimization.is_low_memory);
        assert_eq!(svc.prefetch_route("/crew"), PrefetchDecision::Skipped);
    }

    #[test]
    fn snapshot_reports_auto_activation_once() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::FourG));
        let first = svc.on_connection_change(&ConnectionSignal::online(EffectiveType::TwoG));
        let second = svc.on_connection_change(&ConnectionSignal::online(EffectiveType::TwoG));
        assert_eq!(first.event, Some(LiteModeEvent::AutoActivated));
        assert_eq!(second.event, None);
        assert!(second.lite_mode.enabled);
    }

    #[test]
    fn lite_mode_pins_image_quality() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::FourG));
        assert_eq!(svc.optimized_image_url("/a.jpg", None), "/a.jpg?q=85");
        svc.toggle_lite_mode(Some(true));
        assert_eq!(svc.optimized_image_url("/a.jpg", None), "/a.jpg?q=40");
    }

    #[test]
    fn fetch_options_follow_quality() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::TwoG));
        let opts = svc.optimized_fetch_options(None);
        assert_eq!(opts.timeout_ms, Some(30_000));
        assert!(opts.has_header("Save-Data"));
    }

    #[test]
    fn clearing_override_on_slow_link_reports_activation() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::FourG));
        svc.toggle_lite_mode(Some(false));
        let snap = svc.on_connection_change(&ConnectionSignal::online(EffectiveType::TwoG));
        assert_eq!(snap.event, None);
        assert!(!snap.lite_mode.enabled);

        let snap = svc.clear_lite_mode_override();
        assert_eq!(snap.event, Some(LiteModeEvent::AutoActivated));
        assert!(snap.lite_mode.enabled);
        assert_eq!(snap.optimization, svc.optimization());

        let again = svc.on_connection_change(&ConnectionSignal::online(EffectiveType::TwoG));
        assert_eq!(again.event, None);
    }

    #[test]
    fn clearing_override_on_fast_link_is_quiet() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::FourG));
        svc.toggle_lite_mode(Some(true));
        let snap = svc.clear_lite_mode_override();
        assert_eq!(snap.event, None);
        assert!(!snap.lite_mode.enabled);
    }

    #[test]
    fn service_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<PerformanceService<FileStore, SystemClock, NoopMotionSink>>();
        assert_send::<TestService>();
    }

    #[test]
    fn service_moves_to_another_thread() {
        let mut svc = service();
        svc.on_connection_change(&ConnectionSignal::online(EffectiveType::FourG));
        let shared = std::sync::Arc::new(std::sync::Mutex::new(svc));
        let writer = std::sync::Arc::clone(&shared);
        std::thread::spawn(move || {
            writer
                .lock()
                .unwrap()
                .on_connection_change(&ConnectionSignal::online(EffectiveType::TwoG));
        })
        .join()
        .unwrap();
        let svc = shared.lock().unwrap();
        assert_eq!(svc.network_status().quality, ConnectionQuality::Fair);
        assert!(svc.lite_mode().is_enabled());
        assert!(format!("{svc:?}").contains("PerformanceService"));
    }

    #[test]
    fn zero_image_cache_rejected() {
        let config = AppConfig::default().with_image_url_cache_size(0);
        let result: Result<TestService, _> =
            PerformanceService::new(&config, MemoryStore::new(), ManualClock::new(0), NoopMotionSink);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn open_requires_storage_path() {
        let result = PerformanceService::open(&AppConfig::default(), NoopMotionSink);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
