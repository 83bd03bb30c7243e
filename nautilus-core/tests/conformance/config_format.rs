//! Conformance: serialized config names consumed by the view layer.

use nautilus_core::lite_mode::LiteModeConfig;
use nautilus_core::network_quality::{ConnectionSignal, EffectiveType, NetworkStatus};
use nautilus_core::{MemorySignal, OptimizationConfig};

/// OptimizationConfig exposes camelCase field names.
#[test]
fn conformance_optimization_config_field_names() {
    let status = NetworkStatus::from_signal(&ConnectionSignal::online(EffectiveType::FourG));
    let cfg = OptimizationConfig::derive(&status, &MemorySignal::default());
    let json = serde_json::to_value(cfg).unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "batchSize",
            "connectionQuality",
            "imageQuality",
            "isLowMemory",
            "shouldLazyLoadImages",
            "shouldPrefetch",
            "shouldReduceAnimations",
            "shouldReduceData",
            "timeoutMs",
        ]
    );
}

/// LiteModeConfig exposes the web field names, `simplifyUI` included.
#[test]
fn conformance_lite_mode_config_field_names() {
    let json = serde_json::to_value(LiteModeConfig::default()).unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "disableAnimations",
            "disableAutoplay",
            "disablePrefetch",
            "enabled",
            "reduceImageQuality",
            "reducePollingFrequency",
            "simplifyUI",
        ]
    );
}
