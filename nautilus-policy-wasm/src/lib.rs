//! WASM bindings for the Nautilus One web shell.
//!
//! Thin wrappers over `nautilus-core`: the browser samples
//! `navigator.connection`, `navigator.deviceMemory` and heap usage, hands
//! the raw values in, and reads back quality labels, image URLs,
//! parameters and Lite Mode toggles. No policy lives here.
//!
//! ## Parity
//!
//! Quality labels and effective types use the platform spellings
//! (`"excellent"`, `"slow-2g"`), so values flow unchanged between JS and
//! the native hosts.

use nautilus_core::bandwidth::{self, BandwidthParams, ImageUrlOptimizer};
use nautilus_core::lite_mode::{LiteModeController, LiteModeEvent, MotionSink};
use nautilus_core::{ConnectionQuality, ConnectionSignal, EffectiveType, MemorySignal, NetworkStatus};
use wasm_bindgen::prelude::*;

fn parse_effective_type(raw: Option<String>) -> Option<EffectiveType> {
    raw.map(|t| EffectiveType::parse(&t))
}

fn parse_quality(raw: &str) -> Result<ConnectionQuality, String> {
    raw.parse::<ConnectionQuality>().map_err(|e| e.to_string())
}

fn signal(online: bool, effective_type: Option<String>, save_data: bool) -> ConnectionSignal {
    ConnectionSignal {
        online,
        effective_type: parse_effective_type(effective_type),
        save_data,
        ..ConnectionSignal::default()
    }
}

fn memory(device_memory_gb: Option<f64>, heap_used_ratio: Option<f64>) -> MemorySignal {
    MemorySignal {
        device_memory_gb,
        heap_used_ratio,
    }
}

// ─── Stateless policy ──────────────────────────────────────────────────

/// Quality label for a raw connection sample. A missing or unrecognised
/// effective type classifies as `"poor"` while online.
#[wasm_bindgen(js_name = classifyQuality)]
pub fn classify_quality(online: bool, effective_type: Option<String>) -> String {
    let status = NetworkStatus::from_signal(&signal(online, effective_type, false));
    status.quality.as_str().to_string()
}

#[wasm_bindgen(js_name = getAdaptiveQuality)]
pub fn get_adaptive_quality(label: &str) -> u8 {
    bandwidth::get_adaptive_quality(label)
}

fn image_url(url: &str, width: Option<u32>, quality: &str) -> Result<String, String> {
    Ok(bandwidth::optimized_image_url(url, width, parse_quality(quality)?))
}

#[wasm_bindgen(js_name = optimizedImageUrl)]
pub fn optimized_image_url(url: &str, width: Option<u32>, quality: &str) -> Result<String, JsValue> {
    image_url(url, width, quality).map_err(|e| JsValue::from_str(&e))
}

/// Image quality, batch size and timeout for one quality tier.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WasmBandwidthParams {
    inner: BandwidthParams,
}

#[wasm_bindgen]
impl WasmBandwidthParams {
    #[wasm_bindgen(getter, js_name = imageQuality)]
    pub fn image_quality(&self) -> u8 {
        self.inner.image_quality
    }

    #[wasm_bindgen(getter, js_name = batchSize)]
    pub fn batch_size(&self) -> u32 {
        self.inner.batch_size
    }

    /// Milliseconds. Table values fit comfortably in a JS number.
    #[wasm_bindgen(getter, js_name = timeoutMs)]
    pub fn timeout_ms(&self) -> f64 {
        self.inner.timeout_ms as f64
    }
}

fn params_for(quality: &str) -> Result<WasmBandwidthParams, String> {
    Ok(WasmBandwidthParams {
        inner: BandwidthParams::for_quality(parse_quality(quality)?),
    })
}

#[wasm_bindgen(js_name = bandwidthParams)]
pub fn bandwidth_params(quality: &str) -> Result<WasmBandwidthParams, JsValue> {
    params_for(quality).map_err(|e| JsValue::from_str(&e))
}

// ─── Image memo ────────────────────────────────────────────────────────

/// Page-lifetime memo of optimized image URLs.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WasmImageOptimizer {
    inner: ImageUrlOptimizer,
}

#[wasm_bindgen]
impl WasmImageOptimizer {
    #[wasm_bindgen(constructor)]
    pub fn new(capacity: usize) -> Result<WasmImageOptimizer, JsValue> {
        ImageUrlOptimizer::new(capacity)
            .map(|inner| Self { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn optimize(&mut self, url: &str, width: Option<u32>, quality: &str) -> Result<String, JsValue> {
        let quality = parse_quality(quality).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.inner.optimize(url, width, quality))
    }

    #[wasm_bindgen(getter, js_name = hitRate)]
    pub fn hit_rate(&self) -> f64 {
        self.inner.cache().stats().hit_rate()
    }
}

// ─── Lite Mode ─────────────────────────────────────────────────────────

/// Forwards the reduced-motion flag to an optional JS callback, which
/// typically toggles a class on `document.documentElement`.
#[derive(Debug, Default)]
struct JsMotionSink {
    callback: Option<js_sys::Function>,
}

impl MotionSink for JsMotionSink {
    fn set_reduced_motion(&mut self, reduced: bool) {
        if let Some(callback) = &self.callback {
            // A throwing callback must not poison the controller.
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_bool(reduced));
        }
    }
}

fn event_name(event: Option<LiteModeEvent>) -> Option<String> {
    event.map(|e| {
        match e {
            LiteModeEvent::AutoActivated => "auto-activated",
            LiteModeEvent::AutoDeactivated => "auto-deactivated",
        }
        .to_string()
    })
}

/// Lite Mode controller owned by the web shell.
#[wasm_bindgen]
#[derive(Debug)]
pub struct LiteModeHandle {
    controller: LiteModeController<JsMotionSink>,
}

impl Default for LiteModeHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl LiteModeHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> LiteModeHandle {
        Self {
            controller: LiteModeController::new(JsMotionSink::default()),
        }
    }

    /// Build a handle that reports reduced motion through `callback`.
    #[wasm_bindgen(js_name = withMotionCallback)]
    pub fn with_motion_callback(callback: js_sys::Function) -> LiteModeHandle {
        Self {
            controller: LiteModeController::new(JsMotionSink {
                callback: Some(callback),
            }),
        }
    }

    /// Feed one sample. Returns `"auto-activated"` or
    /// `"auto-deactivated"` on the sample that flips auto Lite Mode.
    #[wasm_bindgen(js_name = onSignal)]
    pub fn on_signal(
        &mut self,
        online: bool,
        effective_type: Option<String>,
        save_data: bool,
        device_memory_gb: Option<f64>,
        heap_used_ratio: Option<f64>,
    ) -> Option<String> {
        let status = NetworkStatus::from_signal(&signal(online, effective_type, save_data));
        let memory = memory(device_memory_gb, heap_used_ratio);
        event_name(self.controller.on_signal(&status, &memory))
    }

    /// `undefined` flips the current state. Returns the new `enabled`.
    #[wasm_bindgen(js_name = toggleLiteMode)]
    pub fn toggle_lite_mode(&mut self, enabled: Option<bool>) -> bool {
        self.controller.toggle_lite_mode(enabled).enabled
    }

    #[wasm_bindgen(js_name = clearOverride)]
    pub fn clear_override(&mut self) -> Option<String> {
        event_name(self.controller.clear_override())
    }

    #[wasm_bindgen(getter)]
    pub fn enabled(&self) -> bool {
        self.controller.config().enabled
    }

    #[wasm_bindgen(getter, js_name = disableAnimations)]
    pub fn disable_animations(&self) -> bool {
        self.controller.config().disable_animations
    }

    #[wasm_bindgen(getter, js_name = reduceImageQuality)]
    pub fn reduce_image_quality(&self) -> bool {
        self.controller.config().reduce_image_quality
    }

    #[wasm_bindgen(getter, js_name = disableAutoplay)]
    pub fn disable_autoplay(&self) -> bool {
        self.controller.config().disable_autoplay
    }

    #[wasm_bindgen(getter, js_name = reducePollingFrequency)]
    pub fn reduce_polling_frequency(&self) -> bool {
        self.controller.config().reduce_polling_frequency
    }

    #[wasm_bindgen(getter, js_name = disablePrefetch)]
    pub fn disable_prefetch(&self) -> bool {
        self.controller.config().disable_prefetch
    }

    #[wasm_bindgen(getter, js_name = simplifyUI)]
    pub fn simplify_ui(&self) -> bool {
        self.controller.config().simplify_ui
    }

    /// `"default"`, `"auto-lite"`, `"user-lite"` or `"user-normal"`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        use nautilus_core::lite_mode::LiteModeState;
        match self.controller.state() {
            LiteModeState::Default => "default",
            LiteModeState::AutoLite => "auto-lite",
            LiteModeState::UserLite => "user-lite",
            LiteModeState::UserNormal => "user-normal",
        }
        .to_string()
    }
}
