//! Stateless vortex writers
//!
//! Same swirl paths as the particle-flow scene, evaluated fresh every tick
//! for one or more instances laid side by side along X. Neighbouring
//! instances spin in opposite directions.

use std::f32::consts::TAU;

use glam::Vec3;

use super::stamp_sphere;
use super::swirl::Swirl;
use crate::grid::VoxelField;
use crate::keys::keyed_enum;
use crate::noise::position_hash;
use crate::params::ParamView;

keyed_enum! {
    /// Sub-pattern of the vortex scene
    pub enum VortexPattern {
        Tornado => "tornado",
        Whirlpool => "whirlpool",
        Galaxy => "galaxy",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VortexParams {
    /// Number of vortex columns
    pub instances: usize,
    /// Points per instance
    pub points: usize,
    /// Base funnel radius in voxels
    pub radius: f32,
    /// Angular rate multiplier
    pub speed: f32,
    /// Spiral arms per instance
    pub arms: usize,
    /// Stamp radius per point in voxels
    pub point_size: f32,
}

impl VortexParams {
    /// Read vortex parameters from the active scope
    pub fn from_view(view: &ParamView<'_>) -> Self {
        Self {
            instances: view.count("instances", 1, 1, 4),
            points: view.count("points", 120, 0, 2000),
            radius: view.float("radius", 6.0).max(0.0),
            speed: view.float("speed", 1.0),
            arms: view.count("arms", 3, 1, 6),
            point_size: view.float("pointSize", 0.5),
        }
    }
}

/// Render every instance into a cleared `field`
pub fn render(pattern: VortexPattern, t: f32, params: &VortexParams, field: &mut VoxelField) {
    let dims = field.dims();
    let n = params.instances.max(1);
    let slot = dims.size_x as f32 / n as f32;
    // Instances share the width, so each radius shrinks with the count
    let radius = params.radius.min(slot * 0.5).max(1.0);

    for k in 0..n {
        let swirl = Swirl {
            center: Vec3::new(
                (k as f32 + 0.5) * slot,
                dims.center().y,
                dims.center().z,
            ),
            radius,
            height: dims.size_y as f32,
            speed: params.speed,
            direction: if k % 2 == 0 { 1.0 } else { -1.0 },
        };

        for i in 0..params.points {
            let phase = i as f32 / params.points as f32;
            let p = match pattern {
                VortexPattern::Tornado => {
                    let progress = (phase + t * params.speed * 0.2).fract();
                    swirl.tornado(progress, phase * TAU * 7.0, t)
                }
                VortexPattern::Whirlpool => {
                    let progress = (phase + t * params.speed * 0.15).fract();
                    swirl.whirlpool(progress, phase * TAU * 5.0, t)
                }
                VortexPattern::Galaxy => {
                    let progress = position_hash(i as i64, 17, k as i64);
                    let spread = position_hash(i as i64, 29, k as i64);
                    swirl.galaxy(progress, i % params.arms, params.arms, spread, t)
                }
            };
            stamp_sphere(field, p, params.point_size, 1.0);
        }
    }
}
