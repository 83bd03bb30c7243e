//! Lite Mode types.

use serde::{Deserialize, Serialize};

/// Global reduction toggles owned by the Lite Mode controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteModeConfig {
    pub enabled: bool,
    pub disable_animations: bool,
    pub reduce_image_quality: bool,
    pub disable_autoplay: bool,
    pub reduce_polling_frequency: bool,
    pub disable_prefetch: bool,
    #[serde(rename = "simplifyUI")]
    pub simplify_ui: bool,
}

impl LiteModeConfig {
    /// Every reduction on. `simplify_ui` is the only optional toggle.
    pub fn full(simplify_ui: bool) -> Self {
        Self {
            enabled: true,
            disable_animations: true,
            reduce_image_quality: true,
            disable_autoplay: true,
            reduce_polling_frequency: true,
            disable_prefetch: true,
            simplify_ui,
        }
    }
}

/// Explicit user choice. `Unset` means "no opinion", which is not the
/// same as having chosen normal mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserOverride {
    #[default]
    Unset,
    ForcedOn,
    ForcedOff,
}

impl UserOverride {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            UserOverride::ForcedOn
        } else {
            UserOverride::ForcedOff
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, UserOverride::Unset)
    }
}

/// Which provenance currently determines the config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LiteModeState {
    /// No slow signal, no override.
    #[default]
    Default,
    /// Slow signal detected, no override.
    AutoLite,
    /// User forced Lite Mode on.
    UserLite,
    /// User forced Lite Mode off.
    UserNormal,
}

impl LiteModeState {
    pub fn is_user_controlled(&self) -> bool {
        matches!(self, LiteModeState::UserLite | LiteModeState::UserNormal)
    }
}

/// One-shot notifications for the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LiteModeEvent {
    /// Lite Mode switched on automatically (Default → AutoLite).
    AutoActivated,
    /// Conditions recovered (AutoLite → Default).
    AutoDeactivated,
}

/// Receiver for the global reduced-motion indicator (a document class
/// in browsers, a theme flag in native shells).
pub trait MotionSink {
    fn set_reduced_motion(&mut self, reduced: bool);
}

impl<F: FnMut(bool)> MotionSink for F {
    fn set_reduced_motion(&mut self, reduced: bool) {
        self(reduced)
    }
}

/// Sink that ignores the indicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMotionSink;

impl MotionSink for NoopMotionSink {
    fn set_reduced_motion(&mut self, _reduced: bool) {}
}
