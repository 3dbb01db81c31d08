use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::easing::Easing;
use crate::error::WheelError;
use crate::sound::CueTable;
use crate::spin_engine::travel_bounds;

/// Every tunable of the wheel. Missing fields fall back to the defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WheelConfig {
    pub sectors: Vec<u32>,
    pub min_spins: u32,
    pub min_duration_ms: u64,
    pub additional_duration_ms: u64,
    pub spin_tick_ms: u64,
    pub shake_tick_ms: u64,
    pub fade_tick_ms: u64,
    pub reveal_pause_ms: u64,
    pub final_pause_ms: u64,
    pub easing: Easing,
    pub fade_step: f64,
    pub glyph_scale: f64,
    /// Show each reveal glyph for the whole of its pause instead of after it.
    pub hold_glyph_during_pause: bool,
    pub cues: CueTable,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            sectors: DEFAULT_SECTORS.to_vec(),
            min_spins: MIN_SPINS,
            min_duration_ms: MIN_SPIN_DURATION_MS,
            additional_duration_ms: ADDITIONAL_SPIN_DURATION_MS,
            spin_tick_ms: SPIN_TICK_MS,
            shake_tick_ms: SHAKE_TICK_MS,
            fade_tick_ms: FADE_TICK_MS,
            reveal_pause_ms: REVEAL_PAUSE_MS,
            final_pause_ms: FINAL_REVEAL_PAUSE_MS,
            easing: Easing::default(),
            fade_step: GLYPH_FADE_STEP,
            glyph_scale: GLYPH_NOMINAL_SCALE,
            hold_glyph_during_pause: false,
            cues: CueTable::default(),
        }
    }
}

impl WheelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, WheelError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WheelError> {
        travel_bounds(self.min_spins, self.sectors.len())?;
        for (name, period) in [
            ("spin_tick_ms", self.spin_tick_ms),
            ("shake_tick_ms", self.shake_tick_ms),
            ("fade_tick_ms", self.fade_tick_ms),
        ] {
            if period == 0 {
                return Err(WheelError::ZeroTickPeriod(name));
            }
        }
        if !(self.fade_step > 0.0) {
            return Err(WheelError::InvalidFadeStep(self.fade_step));
        }
        self.cues.validate()
    }
}
