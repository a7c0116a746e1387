//! Per-voxel color effect library
//!
//! Every effect maps `(base, x, y, z, value)` to a [`Candidate`]. A candidate
//! is either a finished color or a normalized *pattern value*; the
//! [`ColorMode`] decides whether pattern values become hues (rainbow) or
//! brightness of the base color (base). The result is then blended with the
//! base color by the effect intensity.

mod sparkle;
mod voronoi;

pub use sparkle::{SPARKLE_DURATION, SPARKLE_FREQUENCY, SparkleRegistry, VoxelKey};
pub use voronoi::{VORONOI_SEEDS, VoronoiField, VoronoiSeed};

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::convert::{Rgb, hsl_to_rgb, lerp_rgb, rgb_to_hsl, scale_rgb};
use crate::grid::{GridDims, wrap_f32};
use crate::keys::keyed_enum;
use crate::noise::{Perlin3, position_hash};

/// Accepted effect speed range
pub const SPEED_RANGE: (f32, f32) = (0.1, 5.0);

const WHITE: Rgb = [255, 255, 255];

/// Ordered key-color lists for palette cycling
pub const PALETTES: &[&[Rgb]] = &[
    &[[255, 0, 0], [255, 255, 0], [255, 0, 0]],
    &[[0, 255, 0], [0, 255, 255], [0, 255, 0]],
    &[[0, 0, 255], [255, 0, 255], [0, 0, 255]],
    &[[255, 100, 0], [255, 0, 100], [255, 100, 0]],
    &[[100, 0, 255], [255, 0, 200], [100, 0, 255]],
];

keyed_enum! {
    /// Color effect variant
    pub enum EffectKind {
        None => "none",
        Cycle => "cycle",
        Pulse => "pulse",
        Wave => "wave",
        WaveMulti => "waveMulti",
        WaveVertical => "waveVertical",
        WaveCircular => "waveCircular",
        WaveStanding => "waveStanding",
        CycleHue => "cycleHue",
        CyclePalette => "cyclePalette",
        CycleComplementary => "cycleComplementary",
        CycleTriadic => "cycleTriadic",
        PulseRadial => "pulseRadial",
        PulseAlternating => "pulseAlternating",
        PulseLayered => "pulseLayered",
        PulseBeat => "pulseBeat",
        StaticColor => "staticColor",
        StaticDynamic => "staticDynamic",
        StaticWave => "staticWave",
        PulseWave => "pulseWave",
        CyclePulse => "cyclePulse",
        WaveChase => "waveChase",
        StaticCycle => "staticCycle",
        PulseTrail => "pulseTrail",
        DiagonalWaves => "diagonalWaves",
        Helix => "helix",
        Vortex => "vortex",
        Tunnel => "tunnel",
        PerlinNoise => "perlinNoise",
        Voronoi => "voronoi",
        Checkerboard3D => "checkerboard3D",
        SineInterferenceXz => "sineInterferenceXZ",
        SphericalShellsMoving => "sphericalShellsMoving",
        CornerExplosion => "cornerExplosion",
        DepthLayers => "depthLayers",
        CubeInCube => "cubeInCube",
        ManhattanDistance => "manhattanDistance",
        XzMirror => "xzMirror",
        DirectionalSweep => "directionalSweep",
        Sparkle => "sparkle",
        RainbowSweep => "rainbowSweep",
        Fire => "fire",
        Plasma => "plasma",
        Kaleidoscope => "kaleidoscope",
        Breath => "breath",
        ColorChase => "colorChase",
    }
}

/// How pattern values are turned into colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Pattern value is a hue
    #[default]
    Rainbow,
    /// Pattern value scales the base color
    Base,
}

/// Raw output of one effect at one voxel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    /// Normalized value in [0, 1] interpreted through the [`ColorMode`]
    Pattern {
        value: f32,
        saturation: f32,
        lightness: f32,
    },
    /// Final color, independent of the mode
    Color(Rgb),
}

impl Candidate {
    /// Fully saturated pattern value
    pub fn pattern(value: f32) -> Self {
        Self::shaded(value, 1.0, 0.5)
    }

    /// Pattern value with explicit saturation and lightness for rainbow mode
    pub fn shaded(value: f32, saturation: f32, lightness: f32) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self::Pattern {
            value,
            saturation,
            lightness,
        }
    }

    /// Pattern value taken as a wrapping hue
    pub fn hue(hue: f32) -> Self {
        Self::pattern(hue.rem_euclid(1.0))
    }

    /// Resolve to a color under `mode`
    pub fn resolve(self, base: Rgb, mode: ColorMode) -> Rgb {
        match (self, mode) {
            (Self::Color(c), _) => c,
            (
                Self::Pattern {
                    value,
                    saturation,
                    lightness,
                },
                ColorMode::Rainbow,
            ) => hsl_to_rgb(value, saturation, lightness),
            (Self::Pattern { value, .. }, ColorMode::Base) => scale_rgb(base, 0.2 + 0.8 * value),
        }
    }
}

/// Stateful effect evaluator
///
/// Time only advances through [`ColorEffects::update`]; two instances built
/// from the same random source and fed the same calls produce the same
/// colors.
#[derive(Debug, Clone)]
pub struct ColorEffects<R = Pcg32> {
    dims: GridDims,
    effect: EffectKind,
    mode: ColorMode,
    intensity: f32,
    speed: f32,
    time: f32,
    sparkles: SparkleRegistry,
    voronoi: VoronoiField,
    noise: Perlin3,
    rng: R,
}

impl ColorEffects<Pcg32> {
    /// Evaluator whose random state derives from `seed`
    pub fn with_seed(dims: GridDims, seed: u64) -> Self {
        Self::new(dims, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> ColorEffects<R> {
    /// Evaluator drawing from an injected random source
    pub fn new(dims: GridDims, mut rng: R) -> Self {
        let voronoi = VoronoiField::new(&dims, VORONOI_SEEDS, &mut rng);
        let noise = Perlin3::new(&mut rng);
        Self {
            dims,
            effect: EffectKind::None,
            mode: ColorMode::default(),
            intensity: 1.0,
            speed: 1.0,
            time: 0.0,
            sparkles: SparkleRegistry::default(),
            voronoi,
            noise,
            rng,
        }
    }

    pub fn effect(&self) -> EffectKind {
        self.effect
    }

    /// Switch effect; sparkle timers do not survive a switch
    pub fn set_effect(&mut self, effect: EffectKind) {
        if effect != self.effect {
            debug!(from = self.effect.key(), to = effect.key(), "color effect changed");
            self.effect = effect;
            self.sparkles.clear();
        }
    }

    /// Switch effect by key, falling back to `none`
    pub fn set_effect_key(&mut self, key: &str) {
        self.set_effect(EffectKind::from_key_or(key, EffectKind::None));
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Blend factor, clamped to [0, 1]
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Time multiplier, clamped to [`SPEED_RANGE`]
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() {
            speed.clamp(SPEED_RANGE.0, SPEED_RANGE.1)
        } else {
            1.0
        };
    }

    pub fn color_mode(&self) -> ColorMode {
        self.mode
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    /// Seconds accumulated through [`ColorEffects::update`]
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn sparkles(&self) -> &SparkleRegistry {
        &self.sparkles
    }

    pub fn voronoi(&self) -> &VoronoiField {
        &self.voronoi
    }

    /// Advance effect time and the moving state of the active effect
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt;
        match self.effect {
            EffectKind::Sparkle => self.sparkles.expire(self.time),
            EffectKind::Voronoi => self.voronoi.advance(dt * self.speed),
            _ => {}
        }
    }

    /// Final color: the effect color blended with `base` by the intensity
    pub fn apply(&mut self, base: Rgb, x: usize, y: usize, z: usize, value: f32) -> Rgb {
        let color = self.effect_color(base, x, y, z, value);
        lerp_rgb(base, color, self.intensity)
    }

    /// Unblended effect color resolved through the color mode
    pub fn effect_color(&mut self, base: Rgb, x: usize, y: usize, z: usize, value: f32) -> Rgb {
        self.candidate(base, x, y, z, value)
            .resolve(base, self.mode)
    }

    /// Raw candidate of the active effect
    pub fn candidate(&mut self, base: Rgb, x: usize, y: usize, z: usize, value: f32) -> Candidate {
        let t = self.time * self.speed;
        let p = Vec3::new(x as f32, y as f32, z as f32);
        let extent = self.dims.extent();
        let d = p - self.dims.center();
        let (h, s, l) = rgb_to_hsl(base);

        match self.effect {
            EffectKind::None => Candidate::Color(base),

            // ================================================================
            // Base-hue rotation
            // ================================================================
            EffectKind::Cycle => Candidate::Color(hsl_to_rgb(h + t * 0.1, s, l)),
            EffectKind::CycleHue => Candidate::Color(hsl_to_rgb(h + t * 0.2, s, l)),
            EffectKind::Pulse => Candidate::Color(scale_rgb(base, 0.85 + 0.15 * (t * 3.0).sin())),
            EffectKind::Wave => {
                let shift = 0.1 * (p.y * 0.2 + t * 2.0).sin();
                Candidate::Color(hsl_to_rgb(h + shift, s, l))
            }
            EffectKind::CycleComplementary => {
                let shift = 0.25 * (1.0 + (t * 2.0).sin());
                Candidate::Color(hsl_to_rgb(h + shift, s, l))
            }
            EffectKind::Breath => {
                let breath = 0.3 + 0.7 * (0.5 + 0.5 * (t * 1.5).sin());
                Candidate::Color(hsl_to_rgb(h, s * breath, l))
            }
            EffectKind::ColorChase => {
                let head = (t * 15.0).rem_euclid(60.0);
                let dist = ((p.x + p.y + p.z).rem_euclid(60.0) - head).abs();
                let brightness = (1.0 - dist / 10.0).clamp(0.2, 1.0);
                Candidate::Color(scale_rgb(hsl_to_rgb(h + t * 0.5, s, l), brightness))
            }

            // ================================================================
            // Waves and interference
            // ================================================================
            EffectKind::WaveMulti => {
                let sources = [
                    Vec3::new(extent.x * 0.25, 0.0, extent.z * 0.25),
                    Vec3::new(extent.x * 0.75, 0.0, extent.z * 0.25),
                    Vec3::new(extent.x * 0.5, 0.0, extent.z * 0.75),
                ];
                let flat = Vec3::new(p.x, 0.0, p.z);
                let sum: f32 = sources
                    .iter()
                    .map(|src| (flat.distance(*src) * 0.3 - t * 2.0).sin())
                    .sum();
                Candidate::pattern(unit(sum / sources.len() as f32))
            }
            EffectKind::WaveVertical => Candidate::pattern(unit((p.y * 0.3 - t * 2.0).sin())),
            EffectKind::WaveCircular => {
                let r = d.x.hypot(d.z);
                Candidate::pattern(unit((r * 0.5 - t * 3.0).sin()))
            }
            EffectKind::WaveStanding => {
                let v = (p.x * 0.3).sin() * (p.z * 0.3).sin() * (t * 2.0).sin();
                Candidate::pattern(unit(v))
            }
            EffectKind::WaveChase => {
                let channel = |phase: f32| unit((p.x * 0.2 + p.z * 0.2 - t * 3.0 + phase).sin());
                Candidate::Color([
                    to_channel(channel(0.0)),
                    to_channel(channel(TAU / 3.0)),
                    to_channel(channel(2.0 * TAU / 3.0)),
                ])
            }
            EffectKind::PulseWave => {
                let wave = (d.x.hypot(d.z) * 0.3 - t * 2.0).sin();
                let pulse = (t * 5.0).sin();
                Candidate::pattern(unit(wave * (0.5 + 0.5 * pulse)))
            }
            EffectKind::DiagonalWaves => {
                let w1 = ((p.x + p.y) * 0.2 + t * 2.0).sin();
                let w2 = ((p.y + p.z) * 0.2 + t * 1.5).sin();
                let w3 = ((p.x + p.z) * 0.2 + t * 1.8).sin();
                Candidate::pattern(unit((w1 + w2 + w3) / 3.0))
            }
            EffectKind::SineInterferenceXz => {
                let w1 = (p.x * 0.3 + t * 2.0).sin();
                let w2 = (p.z * 0.3 + t * 1.7).sin();
                let w3 = ((p.x + p.z) * 0.2 + t * 1.3).sin();
                Candidate::pattern(unit((w1 + w2 + w3) / 3.0))
            }
            EffectKind::Plasma => {
                let v1 = (p.x * 0.2 + t).sin();
                let v2 = (10.0 * (p.x / extent.x * (t / 2.0).sin() + p.z / extent.z * (t / 3.0).cos())
                    + t)
                    .sin();
                let cx = p.x / extent.x + 0.5 * (t / 5.0).sin();
                let cy = p.y / extent.y + 0.5 * (t / 3.0).cos();
                let v3 = ((100.0 * (cx * cx + cy * cy) + 1.0).sqrt() + t).sin();
                Candidate::pattern(unit((v1 + v2 + v3) / 3.0))
            }
            EffectKind::StaticWave => {
                let nx = (p.x + t * 3.0) * 0.2;
                let ny = p.y * 0.2;
                let nz = p.z * 0.2;
                let v = (nx.sin() * nz.cos() + (ny + nx).sin() * (nz + ny).cos() + 2.0) / 4.0;
                Candidate::pattern(v)
            }

            // ================================================================
            // Palettes and hue families
            // ================================================================
            EffectKind::CyclePalette => Candidate::Color(palette_color(p / extent, t)),
            EffectKind::CycleTriadic => {
                let section = ((p.x + p.y + p.z) / 10.0) as usize % 3;
                Candidate::hue(t * 0.1 + section as f32 / 3.0)
            }
            EffectKind::CyclePulse => {
                let lightness = 0.3 + unit((t * 3.0).sin()) * 0.5;
                Candidate::Color(hsl_to_rgb((t * 0.2).rem_euclid(1.0), 1.0, lightness))
            }
            EffectKind::RainbowSweep => Candidate::hue((p.x + p.y + p.z) * 0.01 + t * 0.2),

            // ================================================================
            // Brightness modulation
            // ================================================================
            EffectKind::PulseRadial => {
                let r = d.length();
                Candidate::pattern(unit((t * 3.0 - r * 0.2).sin()))
            }
            EffectKind::PulseAlternating => {
                let sector = (((d.z.atan2(d.x) + PI) / (PI / 4.0)) as usize) % 8;
                Candidate::pattern(unit((t * 2.0 + sector as f32 * PI / 4.0).sin()))
            }
            EffectKind::PulseLayered => Candidate::pattern(unit((t * 2.0 + p.y * 0.5).sin())),
            EffectKind::PulseBeat => {
                let phase = t.rem_euclid(2.0);
                let beat = if phase < 0.3 {
                    (phase * 10.0).sin()
                } else if phase < 0.7 {
                    ((phase - 0.3) * 8.0).sin()
                } else {
                    0.0
                };
                Candidate::pattern(unit(beat))
            }
            EffectKind::PulseTrail => {
                let trail = (t * 3.0 - d.length() * 0.3).sin().max(0.0);
                Candidate::pattern(trail)
            }

            // ================================================================
            // Positional static
            // ================================================================
            EffectKind::StaticColor => {
                let frame = (t * 10.0).floor() as i64;
                Candidate::pattern(position_hash(x as i64 + frame * 7919, y as i64, z as i64))
            }
            EffectKind::StaticDynamic => {
                let grain = position_hash(x as i64, y as i64, z as i64);
                Candidate::pattern(grain * unit((t * 3.0).sin()))
            }
            EffectKind::StaticCycle => {
                let grain = position_hash(x as i64, y as i64, z as i64);
                Candidate::hue(t * 0.2 + grain * 0.3)
            }

            // ================================================================
            // Spatial structures
            // ================================================================
            EffectKind::Helix => {
                let r = d.x.hypot(d.z);
                let hue = (d.z.atan2(d.x) + p.y * 0.3 + t) / TAU;
                Candidate::shaded(hue.rem_euclid(1.0), 0.7 + 0.3 * (r * 0.2).sin(), 0.5)
            }
            EffectKind::Vortex => {
                let r = d.x.hypot(d.z);
                let spin = 10.0 / (r + 1.0);
                let hue = (d.z.atan2(d.x) + spin * t) / TAU + p.y / extent.y;
                Candidate::shaded(hue.rem_euclid(1.0), 1.0, 0.3 + 0.5 / (1.0 + r * 0.1))
            }
            EffectKind::Tunnel => {
                let depth = (d.x.abs() / (extent.x * 0.5)).max(d.y.abs() / (extent.y * 0.5));
                Candidate::hue(p.z / extent.z + depth + t * 0.3)
            }
            EffectKind::PerlinNoise => {
                let n = self
                    .noise
                    .sample(p.x * 0.1, p.y * 0.1, (p.z + t * 5.0) * 0.1);
                Candidate::shaded(unit(n), 0.8, 0.5)
            }
            EffectKind::Voronoi => Candidate::pattern(self.voronoi.nearest_hue(p)),
            EffectKind::Checkerboard3D => {
                let cell = ((4.0 + (t * 0.5).sin() * 2.0) as usize).max(1);
                let parity = (x / cell + y / cell + z / cell) % 2;
                let base_hue = (t / 12.0).rem_euclid(1.0);
                Candidate::hue(base_hue + parity as f32 * 0.5)
            }
            EffectKind::SphericalShellsMoving => Candidate::hue((d.length() + t * 5.0) / 10.0),
            EffectKind::CornerExplosion => {
                let nearest = (0..8)
                    .map(|i| {
                        let corner = Vec3::new(
                            if i & 1 == 0 { 0.0 } else { extent.x },
                            if i & 2 == 0 { 0.0 } else { extent.y },
                            if i & 4 == 0 { 0.0 } else { extent.z },
                        );
                        p.distance(corner)
                    })
                    .fold(f32::INFINITY, f32::min);
                Candidate::hue(nearest * 0.1 - t * 0.5)
            }
            EffectKind::DepthLayers => {
                let layer_size = extent.z / 5.0;
                let layer = (wrap_f32(p.z + t * 2.0, extent.z) / layer_size)
                    .floor()
                    .min(4.0);
                Candidate::pattern(layer / 5.0)
            }
            EffectKind::CubeInCube => {
                let shell = (d.x.abs() / (extent.x * 0.5))
                    .max(d.y.abs() / (extent.y * 0.5))
                    .max(d.z.abs() / (extent.z * 0.5));
                Candidate::hue(shell + t * 0.2)
            }
            EffectKind::ManhattanDistance => {
                let half = self.dims.center();
                let reach = half.x + half.y + half.z;
                let m = d.x.abs() + d.y.abs() + d.z.abs();
                Candidate::hue(m / reach + t * 0.1)
            }
            EffectKind::XzMirror => {
                let half = extent.y * 0.5;
                let mirrored = if p.y < half { p.y } else { extent.y - p.y };
                Candidate::hue(mirrored / half + t * 0.3)
            }
            EffectKind::DirectionalSweep => {
                let angle = t * 0.5;
                let proj = d.x * angle.cos() + d.z * angle.sin();
                Candidate::pattern(unit((proj * 0.3 - t * 3.0).sin()))
            }
            EffectKind::Kaleidoscope => {
                // folded angle in the vertical XY plane
                let angle = d.y.abs().atan2(d.x.abs()) + t * 0.5;
                let segment = (angle * 6.0).rem_euclid(TAU);
                let r = d.x.hypot(d.z);
                Candidate::shaded((segment / TAU + r * 0.1).rem_euclid(1.0), 0.9, 0.5)
            }

            // ================================================================
            // Flicker
            // ================================================================
            EffectKind::Sparkle => {
                let key = (x as u32, y as u32, z as u32);
                match self.sparkles.brightness(key, self.time) {
                    Some(b) => Candidate::Color(scale_rgb(WHITE, b)),
                    None => {
                        self.sparkles
                            .maybe_activate(key, self.time, &mut self.rng);
                        Candidate::Color(base)
                    }
                }
            }
            EffectKind::Fire => {
                let frame = (t * 10.0).floor() as i64;
                let flicker = position_hash(x as i64, y as i64, z as i64 + frame);
                let height = 1.0 - p.y / extent.y;
                let heat = (height * 0.7 + flicker * 0.3) * (0.5 + 0.5 * value.clamp(0.0, 1.0));
                Candidate::Color(fire_color(heat))
            }
        }
    }
}

/// Map [-1, 1] onto [0, 1]
#[inline]
fn unit(v: f32) -> f32 {
    (v + 1.0) * 0.5
}

#[inline]
fn to_channel(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Thresholded fire bands: black, red, orange, yellow-white
fn fire_color(heat: f32) -> Rgb {
    if heat > 0.8 {
        [255, 255, to_channel((heat - 0.8) * 5.0 * 0.8)]
    } else if heat > 0.5 {
        [255, to_channel((heat - 0.5) / 0.3), 0]
    } else if heat > 0.2 {
        [to_channel((heat - 0.2) / 0.3), 0, 0]
    } else {
        [0, 0, 0]
    }
}

/// Color from a list of key colors at `t` in [0, 1]
pub fn sample_palette(palette: &[Rgb], t: f32) -> Option<Rgb> {
    match palette {
        [] => None,
        [only] => Some(*only),
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (palette.len() - 1) as f32;
            let i = (scaled.floor() as usize).min(palette.len() - 2);
            Some(lerp_rgb(palette[i], palette[i + 1], scaled - i as f32))
        }
    }
}

/// Cross-faded palette cycle; `unit_pos` is the voxel position over the extent
fn palette_color(unit_pos: Vec3, t: f32) -> Rgb {
    let cycle = (t * 0.3).rem_euclid(PALETTES.len() as f32);
    let current = (cycle as usize).min(PALETTES.len() - 1);
    let next = (current + 1) % PALETTES.len();
    let blend = cycle - current as f32;

    let along = (unit_pos.x + unit_pos.y + unit_pos.z) / 3.0;
    let a = sample_palette(PALETTES[current], along).unwrap_or(WHITE);
    let b = sample_palette(PALETTES[next], along).unwrap_or(WHITE);
    lerp_rgb(a, b, blend)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Rgb = [40, 180, 90];

    fn dims() -> GridDims {
        GridDims::new(8, 12, 8).unwrap()
    }

    fn effects(effect: EffectKind) -> ColorEffects {
        let mut fx = ColorEffects::with_seed(dims(), 11);
        fx.set_effect(effect);
        fx
    }

    fn pattern_value(candidate: Candidate) -> f32 {
        match candidate {
            Candidate::Pattern { value, .. } => value,
            Candidate::Color(_) => panic!("expected a pattern value"),
        }
    }

    #[test]
    fn test_wave_multi_sources_mirror_across_x() {
        // sources at (X/4, Z/4), (3X/4, Z/4) and (X/2, 3Z/4)
        let mut fx = effects(EffectKind::WaveMulti);
        fx.update(0.7);
        for z in 0..8 {
            for x in 1..8 {
                let a = pattern_value(fx.candidate(BASE, x, 3, z, 1.0));
                let b = pattern_value(fx.candidate(BASE, 8 - x, 3, z, 1.0));
                assert!((a - b).abs() < 1e-5, "x={x} z={z}");
            }
        }
        let at_source = pattern_value(fx.candidate(BASE, 2, 0, 2, 1.0));
        let expected = ((4.0f32 * 0.3 - 1.4).sin()
            + (20.0f32.sqrt() * 0.3 - 1.4).sin()
            + (-1.4f32).sin())
            / 3.0;
        assert!((at_source - (expected + 1.0) * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_kaleidoscope_folds_vertical_angle() {
        let mut fx = effects(EffectKind::Kaleidoscope);
        // on the center layer the folded angle is zero along both X and Z
        let along_x = pattern_value(fx.candidate(BASE, 7, 6, 4, 1.0));
        let along_z = pattern_value(fx.candidate(BASE, 4, 6, 7, 1.0));
        assert!((along_x - 0.3).abs() < 1e-5);
        assert!((along_z - 0.3).abs() < 1e-5);
        // a vertical offset rotates the segment
        let raised = pattern_value(fx.candidate(BASE, 7, 9, 4, 1.0));
        assert!((raised - 0.05).abs() < 1e-4);
    }

    #[test]
    fn test_every_key_round_trips() {
        assert_eq!(EffectKind::ALL.len(), 46);
        for &kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_key(kind.key()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_none() {
        let mut fx = effects(EffectKind::Plasma);
        fx.set_effect_key("lava");
        assert_eq!(fx.effect(), EffectKind::None);
    }

    #[test]
    fn test_none_returns_base() {
        let mut fx = effects(EffectKind::None);
        assert_eq!(fx.apply(BASE, 3, 4, 5, 1.0), BASE);
    }

    #[test]
    fn test_zero_intensity_is_identity() {
        for &kind in EffectKind::ALL {
            let mut fx = effects(kind);
            fx.set_intensity(0.0);
            fx.update(1.7);
            for (x, y, z) in [(0, 0, 0), (3, 7, 2), (7, 11, 7)] {
                assert_eq!(fx.apply(BASE, x, y, z, 1.0), BASE, "{kind}");
            }
        }
    }

    #[test]
    fn test_full_intensity_is_raw_effect() {
        for &kind in EffectKind::ALL {
            let mut a = effects(kind);
            let mut b = effects(kind);
            a.update(2.3);
            b.update(2.3);
            for (x, y, z) in [(1, 2, 3), (6, 0, 4)] {
                assert_eq!(a.apply(BASE, x, y, z, 1.0), b.effect_color(BASE, x, y, z, 1.0), "{kind}");
            }
        }
    }

    #[test]
    fn test_stateless_effects_deterministic() {
        for &kind in EffectKind::ALL {
            if kind == EffectKind::Sparkle {
                continue;
            }
            let mut fx = effects(kind);
            fx.update(0.9);
            let first = fx.apply(BASE, 2, 5, 6, 1.0);
            assert_eq!(fx.apply(BASE, 2, 5, 6, 1.0), first, "{kind}");
        }
    }

    #[test]
    fn test_intensity_and_speed_clamped() {
        let mut fx = effects(EffectKind::Cycle);
        fx.set_intensity(3.0);
        assert_eq!(fx.intensity(), 1.0);
        fx.set_speed(100.0);
        assert_eq!(fx.speed(), 5.0);
        fx.set_speed(0.0);
        assert_eq!(fx.speed(), 0.1);
    }

    #[test]
    fn test_color_mode_switches_interpretation() {
        let candidate = Candidate::pattern(0.0);
        assert_eq!(candidate.resolve(BASE, ColorMode::Rainbow), [255, 0, 0]);
        assert_eq!(candidate.resolve([100, 200, 50], ColorMode::Base), [20, 40, 10]);
        let full = Candidate::pattern(1.0);
        assert_eq!(full.resolve([100, 200, 50], ColorMode::Base), [100, 200, 50]);
        assert_eq!(Candidate::Color(BASE).resolve([0, 0, 0], ColorMode::Base), BASE);
    }

    #[test]
    fn test_pattern_values_normalized() {
        assert_eq!(
            Candidate::pattern(1.7),
            Candidate::Pattern {
                value: 1.0,
                saturation: 1.0,
                lightness: 0.5
            }
        );
        assert_eq!(Candidate::pattern(f32::NAN), Candidate::pattern(0.0));
        if let Candidate::Pattern { value, .. } = Candidate::hue(-0.25) {
            assert!((value - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sparkle_same_seed_same_colors() {
        let run = || {
            let mut fx = effects(EffectKind::Sparkle);
            let mut out = Vec::new();
            for _ in 0..10 {
                fx.update(0.05);
                for x in 0..8 {
                    for z in 0..8 {
                        out.push(fx.apply(BASE, x, 3, z, 1.0));
                    }
                }
            }
            out
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_sparkles_cleared_on_switch() {
        let mut fx = effects(EffectKind::Sparkle);
        for _ in 0..5 {
            for i in 0..dims().volume() {
                let (x, y, z) = dims().coords(i);
                fx.apply(BASE, x, y, z, 1.0);
            }
        }
        assert!(!fx.sparkles().is_empty());
        fx.set_effect(EffectKind::Fire);
        assert!(fx.sparkles().is_empty());
    }

    #[test]
    fn test_voronoi_seeds_move_only_when_active() {
        let mut fx = effects(EffectKind::None);
        let before = fx.voronoi().seeds().to_vec();
        fx.update(1.0);
        assert_eq!(fx.voronoi().seeds(), before.as_slice());
        fx.set_effect(EffectKind::Voronoi);
        fx.update(1.0);
        assert_ne!(fx.voronoi().seeds(), before.as_slice());
    }

    #[test]
    fn test_palette_sampling() {
        let palette = PALETTES[0];
        assert_eq!(sample_palette(palette, 0.0), Some([255, 0, 0]));
        assert_eq!(sample_palette(palette, 0.5), Some([255, 255, 0]));
        assert_eq!(sample_palette(palette, 1.0), Some([255, 0, 0]));
        assert_eq!(sample_palette(&[], 0.5), None);
        assert_eq!(sample_palette(&[[1, 2, 3]], 0.9), Some([1, 2, 3]));
    }

    #[test]
    fn test_fire_bands() {
        assert_eq!(fire_color(0.1), [0, 0, 0]);
        assert_eq!(fire_color(0.5)[1], 0);
        assert_eq!(fire_color(0.9)[..2], [255, 255]);
    }
}
