//! Scrolling band masks and static gap regions on the scalar field
//!
//! Gap regions always zero their slab of voxels, typically the physical
//! space between stacked cubes. The scrolling mask zeroes a moving band
//! (or, inverted, everything but the band) whose shape is chosen by
//! [`MaskDirection`]. The band position advances with a phase driven by
//! tick time times `speed`.

use std::f32::consts::{FRAC_1_SQRT_2, PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Axis;
use crate::grid::{GridDims, VoxelField};
use crate::keys::keyed_enum;
use crate::params::{ParamValue, ParameterSet};

/// Scroll distance in voxels per unit of phase
const PHASE_DISTANCE: f32 = 10.0;
/// Band width never reaches half the travel when wrapping
const WRAP_THICKNESS_CAP: f32 = 0.49;
/// Distance between concentric ring bands
const RING_PERIOD: f32 = 8.0;

keyed_enum! {
    /// Shape and travel of the scrolling band
    #[derive(Default, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum MaskDirection {
        X => "x",
        #[default]
        Y => "y",
        Z => "z",
        DiagonalXz => "diagonal-xz",
        DiagonalYz => "diagonal-yz",
        DiagonalXy => "diagonal-xy",
        Radial => "radial",
        Spiral => "spiral",
        Wave => "wave",
        Rings => "rings",
        Noise => "noise",
    }
}

/// Slab `[min, max)` along one axis that is never lit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapRegion {
    #[serde(default)]
    pub axis: Axis,
    pub min: usize,
    pub max: usize,
}

impl GapRegion {
    #[inline]
    fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        let v = match self.axis {
            Axis::X => x,
            Axis::Y => y,
            Axis::Z => z,
        };
        v >= self.min && v < self.max
    }
}

/// `[post.mask]` config section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Scrolling band on or off (default: false)
    pub enabled: bool,
    /// Band size in percent of the travel (default: 0, range: 0-100)
    pub thickness: f32,
    pub direction: MaskDirection,
    /// Phase units per second (default: 1.0)
    pub speed: f32,
    /// Bounce back and forth instead of wrapping (default: false)
    pub ping_pong: bool,
    /// Keep only the band instead of removing it (default: false)
    pub invert: bool,
    /// Static gap regions, applied even when the band is disabled
    pub gaps: Vec<GapRegion>,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            thickness: 0.0,
            direction: MaskDirection::default(),
            speed: 1.0,
            ping_pong: false,
            invert: false,
            gaps: Vec::new(),
        }
    }
}

impl MaskConfig {
    /// Copy with the global `mask*` parameters in `params` applied
    pub fn with_overrides(&self, params: &ParameterSet) -> MaskConfig {
        let global = |name: &str| params.global.get(name);
        let float = |name: &str, current: f32| {
            global(name)
                .and_then(ParamValue::as_f32)
                .filter(|v| v.is_finite())
                .unwrap_or(current)
        };
        let flag = |name: &str, current: bool| {
            global(name).and_then(ParamValue::as_bool).unwrap_or(current)
        };
        MaskConfig {
            enabled: flag("maskEnabled", self.enabled),
            thickness: float("maskThickness", self.thickness),
            direction: global("maskDirection")
                .and_then(ParamValue::as_choice)
                .and_then(MaskDirection::from_key)
                .unwrap_or(self.direction),
            speed: float("maskSpeed", self.speed),
            ping_pong: flag("maskPingPong", self.ping_pong),
            invert: flag("maskInvert", self.invert),
            gaps: self.gaps.clone(),
        }
    }

    fn band_active(&self) -> bool {
        self.enabled && self.thickness > 0.0
    }
}

/// Scrolling mask state; only the phase persists between ticks
#[derive(Debug, Clone, Default)]
pub struct MaskStage {
    phase: f32,
    last_time: Option<f32>,
}

impl MaskStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance the phase by the time since the previous call; the first
    /// call only records `t`
    pub fn advance(&mut self, t: f32, speed: f32) {
        if let Some(last) = self.last_time {
            let step = (t - last) * speed;
            if step.is_finite() {
                self.phase += step;
            }
        }
        self.last_time = Some(t);
    }

    /// Zero gap voxels, then the band (or everything outside it)
    pub fn apply(&self, config: &MaskConfig, field: &mut VoxelField) {
        let dims = field.dims();
        let band = config.band_active().then(|| Band::new(self.phase, config, &dims));

        for (i, v) in field.values_mut().iter_mut().enumerate() {
            let (x, y, z) = dims.coords(i);
            if config.gaps.iter().any(|g| g.contains(x, y, z)) {
                *v = 0.0;
                continue;
            }
            if let Some(band) = &band {
                let inside = band.contains(Vec3::new(x as f32, y as f32, z as f32));
                if inside != config.invert {
                    *v = 0.0;
                }
            }
        }
    }
}

/// Per-tick band geometry resolved from the phase and config
#[derive(Debug, Clone, Copy)]
struct Band {
    direction: MaskDirection,
    phase: f32,
    center: Vec3,
    /// Scroll position along the band's travel coordinate
    position: f32,
    /// Length of the travel coordinate
    travel: f32,
    /// Band half-width in travel units, or the threshold for wave/noise
    thickness: f32,
    ping_pong: bool,
}

impl Band {
    fn new(phase: f32, config: &MaskConfig, dims: &GridDims) -> Self {
        let fraction = config.thickness.clamp(0.0, 100.0) / 100.0;
        let extent = dims.extent();
        let center = dims.center();
        let travel = match config.direction {
            MaskDirection::X => extent.x,
            MaskDirection::Y => extent.y,
            MaskDirection::Z => extent.z,
            MaskDirection::DiagonalXz => extent.x.hypot(extent.z),
            MaskDirection::DiagonalYz => extent.y.hypot(extent.z),
            MaskDirection::DiagonalXy => extent.x.hypot(extent.y),
            MaskDirection::Radial | MaskDirection::Spiral | MaskDirection::Rings => center.length(),
            // wave and noise thresholds work on a fixed 0-20 scale
            MaskDirection::Wave | MaskDirection::Noise => 20.0,
        };

        let raw = phase * PHASE_DISTANCE;
        let position = if config.ping_pong {
            let cycle = travel * 2.0;
            let p = raw.rem_euclid(cycle);
            if p > travel { cycle - p } else { p }
        } else {
            raw.rem_euclid(travel)
        };

        Self {
            direction: config.direction,
            phase,
            center,
            position,
            travel,
            thickness: fraction * travel,
            ping_pong: config.ping_pong,
        }
    }

    /// Distance test along a travel coordinate, toroidal unless ping-pong
    fn near(&self, coord: f32) -> bool {
        let linear = (coord - self.position).abs();
        if self.ping_pong {
            linear < self.thickness
        } else {
            let wrapped = linear.rem_euclid(self.travel);
            let dist = wrapped.min(self.travel - wrapped);
            dist < self.thickness.min(self.travel * WRAP_THICKNESS_CAP)
        }
    }

    fn contains(&self, p: Vec3) -> bool {
        let phase = self.phase;
        match self.direction {
            MaskDirection::X => self.near(p.x),
            MaskDirection::Y => self.near(p.y),
            MaskDirection::Z => self.near(p.z),
            MaskDirection::DiagonalXz => self.near((p.x + p.z) * FRAC_1_SQRT_2),
            MaskDirection::DiagonalYz => self.near((p.y + p.z) * FRAC_1_SQRT_2),
            MaskDirection::DiagonalXy => self.near((p.x + p.y) * FRAC_1_SQRT_2),
            MaskDirection::Radial => self.near(p.distance(self.center)),
            MaskDirection::Spiral => {
                // Archimedean spiral in the horizontal plane, rotating with the phase
                let dx = p.x - self.center.x;
                let dz = p.z - self.center.z;
                let reach = self.center.x.hypot(self.center.z);
                let tightness = reach / TAU * 1.5;
                let angle = (dz.atan2(dx) + PI + phase * 0.5).rem_euclid(TAU);
                (dx.hypot(dz) - angle * tightness).abs() < self.thickness
            }
            MaskDirection::Wave => {
                let wave = (p.x * 0.3 + phase * 2.0).sin()
                    + (p.y * 0.3 + phase * 2.0).cos()
                    + (p.z * 0.3 + phase * 2.0).sin();
                wave < -3.0 + self.thickness / 20.0 * 6.0
            }
            MaskDirection::Rings => {
                let ring = (p.distance(self.center) + phase * PHASE_DISTANCE).rem_euclid(RING_PERIOD);
                ring < self.thickness / 20.0 * RING_PERIOD
            }
            MaskDirection::Noise => {
                let coarse = (p.x * 0.2 + phase).sin()
                    * (p.y * 0.2 - phase * 0.7).cos()
                    * (p.z * 0.2 + phase * 0.5).sin();
                let medium = (p.x * 0.5 + phase * 1.5).sin()
                    * (p.y * 0.5 + phase * 1.2).cos()
                    * (p.z * 0.5 - phase * 0.8).sin();
                let fine = (p.x - phase * 2.0).sin()
                    * (p.y + phase * 1.8).cos()
                    * (p.z + phase * 1.5).sin();
                let noise = coarse * 0.5 + medium * 0.3 + fine * 0.2;
                noise < -1.0 + self.thickness / 20.0 * 2.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_field(dims: GridDims) -> VoxelField {
        let mut field = VoxelField::new(dims);
        field.values_mut().fill(1.0);
        field
    }

    fn band(direction: MaskDirection, thickness: f32) -> MaskConfig {
        MaskConfig {
            enabled: true,
            thickness,
            direction,
            ..Default::default()
        }
    }

    // =============================================================
    // Gap regions
    // =============================================================

    #[test]
    fn test_gap_zeroes_slab_without_band() {
        let dims = GridDims::new(4, 10, 4).unwrap();
        let mut field = lit_field(dims);
        let config = MaskConfig {
            gaps: vec![GapRegion {
                axis: Axis::Y,
                min: 4,
                max: 6,
            }],
            ..Default::default()
        };
        MaskStage::new().apply(&config, &mut field);
        assert_eq!(field.active_count(), dims.volume() - 2 * 16);
        assert_eq!(field.get(1, 4, 1), 0.0);
        assert_eq!(field.get(1, 5, 1), 0.0);
        assert_eq!(field.get(1, 6, 1), 1.0);
    }

    // =============================================================
    // Scrolling band
    // =============================================================

    #[test]
    fn test_disabled_or_zero_thickness_is_identity() {
        let dims = GridDims::new(5, 5, 5).unwrap();
        let stage = MaskStage::new();
        for config in [
            MaskConfig {
                thickness: 50.0,
                ..Default::default()
            },
            band(MaskDirection::Radial, 0.0),
        ] {
            let mut field = lit_field(dims);
            stage.apply(&config, &mut field);
            assert_eq!(field.active_count(), dims.volume());
        }
    }

    #[test]
    fn test_axis_band_at_start() {
        // phase 0: band centered on y = 0, 20% of 10 layers = 2 voxels
        let dims = GridDims::new(3, 10, 3).unwrap();
        let mut field = lit_field(dims);
        MaskStage::new().apply(&band(MaskDirection::Y, 20.0), &mut field);
        for y in 0..10 {
            let expected = if matches!(y, 0 | 1 | 9) { 0.0 } else { 1.0 };
            assert_eq!(field.get(1, y, 1), expected, "y={y}");
        }
    }

    #[test]
    fn test_invert_keeps_only_band() {
        let dims = GridDims::new(3, 10, 3).unwrap();
        let mut field = lit_field(dims);
        let config = MaskConfig {
            invert: true,
            ..band(MaskDirection::Y, 20.0)
        };
        MaskStage::new().apply(&config, &mut field);
        assert_eq!(field.active_count(), 3 * 9);
        assert_eq!(field.get(0, 0, 0), 1.0);
        assert_eq!(field.get(0, 5, 0), 0.0);
    }

    #[test]
    fn test_full_thickness_never_masks_everything_when_wrapping() {
        let dims = GridDims::new(2, 10, 2).unwrap();
        let mut field = lit_field(dims);
        MaskStage::new().apply(&band(MaskDirection::Y, 100.0), &mut field);
        assert!(field.active_count() > 0);
    }

    #[test]
    fn test_phase_moves_band() {
        let dims = GridDims::new(2, 10, 2).unwrap();
        let config = band(MaskDirection::Y, 10.0);
        let mut stage = MaskStage::new();
        stage.advance(1.0, 1.0);
        assert_eq!(stage.phase(), 0.0);
        // 0.3 s at speed 1 scrolls 3 layers
        stage.advance(1.3, 1.0);
        assert!((stage.phase() - 0.3).abs() < 1e-6);

        let mut field = lit_field(dims);
        stage.apply(&config, &mut field);
        assert_eq!(field.get(0, 3, 0), 0.0);
        assert_eq!(field.get(0, 0, 0), 1.0);
    }

    #[test]
    fn test_ping_pong_reflects() {
        let dims = GridDims::new(1, 10, 1).unwrap();
        let config = MaskConfig {
            ping_pong: true,
            ..band(MaskDirection::Y, 5.0)
        };
        // raw distance 13 over travel 10 bounces back to 7
        let stage = MaskStage {
            phase: 1.3,
            last_time: None,
        };
        let mut field = lit_field(dims);
        stage.apply(&config, &mut field);
        assert_eq!(field.get(0, 7, 0), 0.0);
        assert_eq!(field.get(0, 3, 0), 1.0);
    }

    #[test]
    fn test_radial_band_hollows_center() {
        let dims = GridDims::new(10, 10, 10).unwrap();
        let mut field = lit_field(dims);
        MaskStage::new().apply(&band(MaskDirection::Radial, 10.0), &mut field);
        assert_eq!(field.get(5, 5, 5), 0.0);
        assert_eq!(field.get(0, 5, 5), 1.0);
    }

    #[test]
    fn test_every_direction_keeps_values_in_range() {
        let dims = GridDims::new(6, 8, 5).unwrap();
        let stage = MaskStage {
            phase: 2.7,
            last_time: None,
        };
        for &direction in MaskDirection::ALL {
            for thickness in [0.0, 35.0, 100.0] {
                let mut field = lit_field(dims);
                stage.apply(&band(direction, thickness), &mut field);
                assert!(
                    field.values().iter().all(|v| *v == 0.0 || *v == 1.0),
                    "{direction}"
                );
            }
        }
    }

    #[test]
    fn test_wave_and_noise_thresholds_span_range() {
        let dims = GridDims::new(6, 6, 6).unwrap();
        for direction in [MaskDirection::Wave, MaskDirection::Noise] {
            let mut none = lit_field(dims);
            MaskStage::new().apply(&band(direction, 0.1), &mut none);
            assert_eq!(none.active_count(), dims.volume(), "{direction}");

            let mut all = lit_field(dims);
            MaskStage::new().apply(&band(direction, 100.0), &mut all);
            assert!(all.active_count() < dims.volume() / 4, "{direction}");
        }
    }

    #[test]
    fn test_global_overrides() {
        let params = ParameterSet::new()
            .with_global("maskEnabled", true)
            .with_global("maskThickness", 40.0)
            .with_global("maskDirection", "diagonal-xz")
            .with_global("maskInvert", true);
        let config = MaskConfig::default().with_overrides(&params);
        assert!(config.enabled);
        assert_eq!(config.thickness, 40.0);
        assert_eq!(config.direction, MaskDirection::DiagonalXz);
        assert!(config.invert);
        assert!(!config.ping_pong);
    }

    #[test]
    fn test_config_from_toml() {
        let config: MaskConfig = toml::from_str(
            r#"
enabled = true
thickness = 25.0
direction = "diagonal-yz"

[[gaps]]
axis = "z"
min = 2
max = 3
"#,
        )
        .unwrap();
        assert_eq!(config.direction, MaskDirection::DiagonalYz);
        assert_eq!(config.thickness, 25.0);
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.gaps[0].axis, Axis::Z);
    }
}
