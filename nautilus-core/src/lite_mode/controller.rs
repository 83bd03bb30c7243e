//! Lite Mode controller — auto-detection with sticky user override.
//!
//! ## State machine
//! ```text
//!            slow signal                    toggle(on)
//!  Default ───────────────▶ AutoLite        ─────────▶ UserLite
//!     ▲  ◀───────────────                   toggle(off)
//!     │      recovered                      ─────────▶ UserNormal
//!     └──────────────── clear_override() ◀── (either user state)
//! ```
//!
//! While an override is set, signal changes are recorded but never
//! change the config. Only [`LiteModeController::clear_override`] hands
//! control back to auto-detection; the controller never clears it.

use tracing::{debug, info};

use super::types::{
    LiteModeConfig, LiteModeEvent, LiteModeState, MotionSink, UserOverride,
};
use crate::network_quality::{EffectiveType, NetworkStatus};
use crate::optimization::MemorySignal;

/// Whether signals warrant automatic Lite Mode.
pub fn detect_slow(status: &NetworkStatus, memory: &MemorySignal) -> bool {
    !status.online || status.effective_type.is_slow() || status.save_data || memory.is_low_memory()
}

/// `simplify_ui` is reserved for the worst connection tier.
fn simplify_ui(status: Option<&NetworkStatus>) -> bool {
    status.is_some_and(|s| s.effective_type == EffectiveType::Slow2G)
}

/// Owns [`LiteModeConfig`] and its provenance.
pub struct LiteModeController<M> {
    state: LiteModeState,
    user_override: UserOverride,
    config: LiteModeConfig,
    last_status: Option<NetworkStatus>,
    last_memory: MemorySignal,
    motion_sink: M,
    applied_reduced_motion: Option<bool>,
}

impl<M: MotionSink> LiteModeController<M> {
    pub fn new(motion_sink: M) -> Self {
        let mut controller = Self {
            state: LiteModeState::Default,
            user_override: UserOverride::Unset,
            config: LiteModeConfig::default(),
            last_status: None,
            last_memory: MemorySignal::default(),
            motion_sink,
            applied_reduced_motion: None,
        };
        controller.apply_reduced_motion();
        controller
    }

    /// Feed a new observation.
    ///
    /// Returns `Some(AutoActivated)` exactly once per transition into
    /// `AutoLite` and `Some(AutoDeactivated)` when leaving it. Returns
    /// `None` while an override is set.
    pub fn on_signal(
        &mut self,
        status: &NetworkStatus,
        memory: &MemorySignal,
    ) -> Option<LiteModeEvent> {
        self.last_status = Some(status.clone());
        self.last_memory = *memory;
        if self.user_override.is_set() {
            debug!(state = ?self.state, "lite mode override active, signal ignored");
            return None;
        }
        let event = self.rederive();
        self.apply_reduced_motion();
        event
    }

    // Events are tied to the Default <-> AutoLite edges, so a run of slow
    // signals yields exactly one AutoActivated.
    fn rederive(&mut self) -> Option<LiteModeEvent> {
        let slow = self
            .last_status
            .as_ref()
            .is_some_and(|s| detect_slow(s, &self.last_memory));

        match (self.state, slow) {
            (LiteModeState::Default, true) => {
                self.state = LiteModeState::AutoLite;
                self.config = LiteModeConfig::full(simplify_ui(self.last_status.as_ref()));
                info!(simplify_ui = self.config.simplify_ui, "lite mode auto-activated");
                Some(LiteModeEvent::AutoActivated)
            }
            (LiteModeState::AutoLite, true) => {
                self.config = LiteModeConfig::full(simplify_ui(self.last_status.as_ref()));
                None
            }
            (LiteModeState::AutoLite, false) => {
                self.state = LiteModeState::Default;
                self.config = LiteModeConfig::default();
                info!("lite mode auto-deactivated");
                Some(LiteModeEvent::AutoDeactivated)
            }
            _ => None,
        }
    }

    /// Apply an explicit user choice. `None` flips the effective state.
    ///
    /// The choice is sticky until [`clear_override`](Self::clear_override).
    pub fn toggle_lite_mode(&mut self, enabled: Option<bool>) -> LiteModeConfig {
        let enabled = enabled.unwrap_or(!self.config.enabled);
        self.user_override = UserOverride::from_enabled(enabled);
        if enabled {
            self.state = LiteModeState::UserLite;
            self.config = LiteModeConfig::full(simplify_ui(self.last_status.as_ref()));
        } else {
            self.state = LiteModeState::UserNormal;
            self.config = LiteModeConfig::default();
        }
        info!(enabled, "lite mode set by user");
        self.apply_reduced_motion();
        self.config
    }

    /// Drop the user override and re-derive from the last signals.
    pub fn clear_override(&mut self) -> Option<LiteModeEvent> {
        if !self.user_override.is_set() {
            return None;
        }
        self.user_override = UserOverride::Unset;
        self.state = LiteModeState::Default;
        self.config = LiteModeConfig::default();
        debug!("lite mode override cleared");
        let event = self.rederive();
        self.apply_reduced_motion();
        event
    }

    // Only forwards real changes, so repeated identical state is a no-op.
    fn apply_reduced_motion(&mut self) {
        let reduced = self.config.disable_animations;
        if self.applied_reduced_motion != Some(reduced) {
            self.motion_sink.set_reduced_motion(reduced);
            self.applied_reduced_motion = Some(reduced);
        }
    }

    pub fn config(&self) -> LiteModeConfig {
        self.config
    }

    pub fn state(&self) -> LiteModeState {
        self.state
    }

    pub fn user_override(&self) -> UserOverride {
        self.user_override
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn motion_sink(&self) -> &M {
        &self.motion_sink
    }
}

impl<M> std::fmt::Debug for LiteModeController<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiteModeController")
            .field("state", &self.state)
            .field("user_override", &self.user_override)
            .field("config", &self.config)
            .finish()
    }
}
