//! Particle-flow generator
//!
//! Straight flows (`fall`, `rain`, `drift`) advance a persistent
//! [`ParticleSystem`]. Synthetic paths (`spiral`, `explode`, `tornado`,
//! `whirlpool`, `galaxy`) place particles analytically from time, so they
//! carry no state between ticks.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::stamp_sphere;
use super::swirl::Swirl;
use crate::grid::{GridDims, VoxelField};
use crate::keys::keyed_enum;
use crate::noise::position_hash;
use crate::params::ParamView;
use crate::particles::ParticleSystem;

/// Particles allocated at density 1.0
pub const BASE_PARTICLE_COUNT: usize = 100;

/// Seconds per explosion cycle (before the speed multiplier)
const EXPLOSION_CYCLE: f32 = 3.0;

keyed_enum! {
    /// Sub-pattern of the particle-flow scene
    pub enum FlowPattern {
        Fall => "fall",
        Rain => "rain",
        Drift => "drift",
        Spiral => "spiral",
        Explosion => "explode",
        Tornado => "tornado",
        Whirlpool => "whirlpool",
        Galaxy => "galaxy",
    }
}

/// Tunables read each tick
#[derive(Debug, Clone, PartialEq)]
pub struct FlowParams {
    /// Particle count multiplier
    pub density: f32,
    /// Particle velocity multiplier
    pub speed: f32,
    /// Stamp radius in voxels; at or below 0.5 a single voxel is lit
    pub particle_size: f32,
    /// Swirl/spiral radius in voxels
    pub radius: f32,
    /// Spiral arm count
    pub arms: usize,
}

impl FlowParams {
    /// Read flow parameters; the default radius follows the grid size
    pub fn from_view(view: &ParamView<'_>, dims: &GridDims) -> Self {
        let default_radius = 0.4 * dims.size_x.min(dims.size_z) as f32;
        Self {
            density: view.float("density", 0.5).max(0.0),
            speed: view.float("speed", 1.0),
            particle_size: view.float("particleSize", 0.5),
            radius: view.float("radius", default_radius).max(0.0),
            arms: view.count("arms", 3, 1, 6),
        }
    }

    fn count(&self) -> usize {
        (BASE_PARTICLE_COUNT as f32 * self.density).floor() as usize
    }
}

/// Particle-flow generator state
#[derive(Debug, Clone)]
pub struct ParticleFlow {
    dims: GridDims,
    active: Option<(FlowPattern, f32)>,
    system: ParticleSystem,
}

impl ParticleFlow {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            active: None,
            system: ParticleSystem::falling(dims, BASE_PARTICLE_COUNT),
        }
    }

    /// Live particle system (empty for synthetic patterns)
    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    /// Render one tick into `field`, which must already be cleared
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        pattern: FlowPattern,
        t: f32,
        params: &FlowParams,
        field: &mut VoxelField,
        rng: &mut R,
    ) {
        match pattern {
            FlowPattern::Fall | FlowPattern::Rain | FlowPattern::Drift => {
                self.render_straight(pattern, params, field, rng)
            }
            _ => {
                self.active = None;
                self.render_synthetic(pattern, t, params, field);
            }
        }
    }

    fn render_straight<R: Rng + ?Sized>(
        &mut self,
        pattern: FlowPattern,
        params: &FlowParams,
        field: &mut VoxelField,
        rng: &mut R,
    ) {
        // Re-seed the population when the pattern or density changes
        if self.active != Some((pattern, params.density)) {
            self.system = match pattern {
                FlowPattern::Drift => ParticleSystem::drifting(self.dims, BASE_PARTICLE_COUNT),
                _ => ParticleSystem::falling(self.dims, BASE_PARTICLE_COUNT),
            };
            self.system.init(params.density, rng);
            self.active = Some((pattern, params.density));
            tracing::debug!(
                pattern = pattern.key(),
                particles = self.system.len(),
                "particle system initialized"
            );
        }

        let step = if pattern == FlowPattern::Rain {
            params.speed * 1.5
        } else {
            params.speed * 0.5
        };
        self.system.update(step, rng);

        for p in self.system.particles() {
            stamp_sphere(field, p.position, params.particle_size, 1.0);
        }
    }

    fn render_synthetic(
        &self,
        pattern: FlowPattern,
        t: f32,
        params: &FlowParams,
        field: &mut VoxelField,
    ) {
        let count = params.count();
        if count == 0 {
            return;
        }
        let dims = self.dims;
        let swirl = Swirl {
            center: Vec3::new(dims.center().x, 0.0, dims.center().z),
            radius: params.radius,
            height: dims.size_y as f32,
            speed: params.speed,
            direction: 1.0,
        };

        for i in 0..count {
            let phase = i as f32 / count as f32;
            let p = match pattern {
                FlowPattern::Spiral => {
                    let progress = (phase + t * params.speed * 0.1).fract();
                    let strand = (i % params.arms) as f32 * TAU / params.arms as f32;
                    let angle = progress * 3.0 * TAU + t * params.speed * 2.0 + strand;
                    Vec3::new(
                        swirl.center.x + params.radius * angle.cos(),
                        progress * swirl.height,
                        swirl.center.z + params.radius * angle.sin(),
                    )
                }
                FlowPattern::Explosion => explosion_point(&dims, i, t * params.speed),
                FlowPattern::Tornado => {
                    let progress = (phase + t * params.speed * 0.2).fract();
                    swirl.tornado(progress, phase * TAU * 7.0, t)
                }
                FlowPattern::Whirlpool => {
                    let progress = (phase + t * params.speed * 0.15).fract();
                    swirl.whirlpool(progress, phase * TAU * 5.0, t)
                }
                FlowPattern::Galaxy => {
                    let galaxy = Swirl {
                        center: dims.center(),
                        ..swirl
                    };
                    let progress = position_hash(i as i64, 17, 0);
                    let spread = position_hash(i as i64, 29, 1);
                    galaxy.galaxy(progress, i % params.arms, params.arms, spread, t)
                }
                FlowPattern::Fall | FlowPattern::Rain | FlowPattern::Drift => continue,
            };
            stamp_sphere(field, p, params.particle_size, 1.0);
        }
    }
}

/// Position of particle `i` in the explosion cycle containing `t`
fn explosion_point(dims: &GridDims, i: usize, t: f32) -> Vec3 {
    let cycle = (t / EXPLOSION_CYCLE).floor();
    let elapsed = t - cycle * EXPLOSION_CYCLE;
    let c = cycle as i64;

    // Center somewhere in the middle half of the grid, fixed per cycle
    let extent = dims.extent();
    let center = Vec3::new(
        extent.x * (0.25 + 0.5 * position_hash(c, 1, 0)),
        extent.y * (0.25 + 0.5 * position_hash(c, 2, 0)),
        extent.z * (0.25 + 0.5 * position_hash(c, 3, 0)),
    );

    let theta = position_hash(i as i64, c, 11) * TAU;
    let phi = position_hash(i as i64, c, 13) * std::f32::consts::PI;
    let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

    let radius = 2.0 + 5.0 * elapsed;
    // Vertical travel is compressed to match the doubled vertical metric
    center + Vec3::new(dir.x, dir.y / dims.vertical_scale, dir.z) * radius
}
