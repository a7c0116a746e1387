//! Global post effects on the scalar field
//!
//! Applied after the generator in a fixed order: decay, strobe, pulse,
//! mask, invert. Config values can be overridden per tick by the global
//! parameters `decay`, `strobe`, `pulse` and `invert`, plus the `mask*`
//! parameters read by [`MaskConfig::with_overrides`].

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::grid::VoxelField;
use crate::mask::{MaskConfig, MaskStage};
use crate::params::{ParamValue, ParameterSet};

/// Highest accepted decay level
pub const MAX_DECAY: f32 = 3.0;
/// Values at or below this are not inverted
const INVERT_THRESHOLD: f32 = 0.01;

/// Strobe / pulse rate selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rate {
    #[default]
    Off,
    Slow,
    Medium,
    Fast,
}

impl Rate {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "off" => Some(Self::Off),
            "slow" => Some(Self::Slow),
            "medium" => Some(Self::Medium),
            "fast" => Some(Self::Fast),
            _ => None,
        }
    }

    /// Strobe frequency in Hz
    pub fn strobe_hz(self) -> Option<f32> {
        match self {
            Self::Off => None,
            Self::Slow => Some(2.0),
            Self::Medium => Some(5.0),
            Self::Fast => Some(10.0),
        }
    }

    /// Pulse frequency in Hz
    pub fn pulse_hz(self) -> Option<f32> {
        match self {
            Self::Off => None,
            Self::Slow => Some(0.5),
            Self::Medium => Some(1.0),
            Self::Fast => Some(2.0),
        }
    }
}

/// `[post]` config section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Trail strength, 0 disables (range: 0-3)
    pub decay: f32,
    pub strobe: Rate,
    pub pulse: Rate,
    pub invert: bool,
    /// Scrolling band and gap regions
    pub mask: MaskConfig,
}

impl PostConfig {
    /// Copy with any global post parameters in `params` applied
    pub fn with_overrides(&self, params: &ParameterSet) -> PostConfig {
        let global = |name: &str| params.global.get(name);
        let rate = |name: &str, current: Rate| {
            global(name)
                .and_then(ParamValue::as_choice)
                .and_then(Rate::from_key)
                .unwrap_or(current)
        };
        PostConfig {
            decay: global("decay")
                .and_then(ParamValue::as_f32)
                .filter(|v| v.is_finite())
                .unwrap_or(self.decay),
            strobe: rate("strobe", self.strobe),
            pulse: rate("pulse", self.pulse),
            invert: global("invert")
                .and_then(ParamValue::as_bool)
                .unwrap_or(self.invert),
            mask: self.mask.with_overrides(params),
        }
    }
}

/// Post effect state: the previous field for decay trails and the mask phase
#[derive(Debug, Clone, Default)]
pub struct PostEffects {
    previous: Vec<f32>,
    mask: MaskStage,
}

impl PostEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the stored trail
    pub fn reset(&mut self) {
        self.previous.clear();
    }

    pub fn mask(&self) -> &MaskStage {
        &self.mask
    }

    pub fn apply(&mut self, t: f32, settings: &PostConfig, field: &mut VoxelField) {
        let decay = settings.decay.clamp(0.0, MAX_DECAY);
        if decay > 0.0 && self.previous.len() == field.values().len() {
            let fade = 0.4 + decay * 0.18;
            for (v, prev) in field.values_mut().iter_mut().zip(&self.previous) {
                *v = v.max(prev * fade);
            }
        }
        self.previous.clear();
        self.previous.extend_from_slice(field.values());

        if let Some(hz) = settings.strobe.strobe_hz() {
            let phase = (t * hz * 2.0).floor() as i64;
            if phase.rem_euclid(2) == 1 {
                field.clear();
            }
        }

        if let Some(hz) = settings.pulse.pulse_hz() {
            let gain = 0.65 + 0.35 * (t * hz * TAU).sin();
            for v in field.values_mut() {
                *v *= gain;
            }
        }

        self.mask.advance(t, settings.mask.speed);
        self.mask.apply(&settings.mask, field);

        if settings.invert {
            for v in field.values_mut() {
                if *v > INVERT_THRESHOLD {
                    *v = 1.0 - *v;
                }
            }
        }
    }
}
