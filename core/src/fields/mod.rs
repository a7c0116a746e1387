//! Volumetric field generators
//!
//! - [`particle_flow`]: stateful falling/drifting particles and synthetic
//!   swirl, spiral and explosion paths
//! - [`waves`]: analytic ripple, sweep, standing, interference and plasma
//! - [`procedural`]: thresholded gradient noise and cellular walls
//! - [`vortex`]: stateless multi-instance swirls
//! - [`lattice`]: full volume, dot lattice, cross and wireframe box
//! - [`illusions`]: corridor frames, waterfall stripes, Pulfrich ring, moire

pub mod illusions;
pub mod lattice;
pub mod particle_flow;
pub mod procedural;
pub mod swirl;
pub mod vortex;
pub mod waves;

use glam::Vec3;

use crate::grid::VoxelField;

/// Light the voxel nearest `p`, wrapping out-of-range coordinates
#[inline]
pub fn stamp_point(field: &mut VoxelField, p: Vec3, value: f32) {
    field.stamp_wrapped(
        p.x.floor() as i64,
        p.y.floor() as i64,
        p.z.floor() as i64,
        value,
    );
}

/// Light a small filled sphere around `p`, or a single voxel when the
/// radius is under half a voxel
pub fn stamp_sphere(field: &mut VoxelField, p: Vec3, radius: f32, value: f32) {
    if radius <= 0.5 {
        stamp_point(field, p, value);
        return;
    }

    let dims = field.dims();
    let vs = dims.vertical_scale;
    // a window of one grid extent already covers every wrapped cell
    let reach = radius.ceil() as i64;
    let reach_x = reach.min(dims.size_x as i64);
    let reach_z = reach.min(dims.size_z as i64);
    let reach_y = ((radius / vs).ceil() as i64).min(dims.size_y as i64);
    let (cx, cy, cz) = (p.x.round() as i64, p.y.round() as i64, p.z.round() as i64);

    for dz in -reach_z..=reach_z {
        for dy in -reach_y..=reach_y {
            for dx in -reach_x..=reach_x {
                let (x, y, z) = (cx + dx, cy + dy, cz + dz);
                let d = Vec3::new(
                    x as f32 - p.x,
                    (y as f32 - p.y) * vs,
                    z as f32 - p.z,
                );
                if d.length() < radius {
                    field.stamp_wrapped(x, y, z, value);
                }
            }
        }
    }
}
