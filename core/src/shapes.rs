//! Implicit-surface rasterizers
//!
//! Each volumetric shape tests every grid cell against an inequality in
//! pose-local space (see [`Pose::local`]). The helix instead walks height
//! layers and stamps a small disc around each strand point.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::grid::{VoxelField, wrap_centered};
use crate::keys::keyed_enum;
use crate::params::ParamView;
use crate::transform::Pose;

keyed_enum! {
    /// Geometric shape rendered by the shape-morph scene
    pub enum ShapeKind {
        Sphere => "sphere",
        Torus => "torus",
        Cube => "cube",
        Pyramid => "pyramid",
        Plane => "plane",
        Helix => "helix",
    }
}

/// Shape dimensions in voxels
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeParams {
    /// Sphere radius, torus major radius, cube/pyramid half extent, helix radius
    pub radius: f32,
    /// Shell half-thickness
    pub thickness: f32,
    /// Torus tube radius
    pub minor_radius: f32,
    /// Number of parallel plane layers
    pub layers: usize,
    /// Distance between plane layers in voxels
    pub layer_spacing: f32,
    /// Helix twist in radians per voxel of height
    pub turns: f32,
}

impl ShapeParams {
    /// Read shape parameters, sizing defaults from the grid
    pub fn from_view(view: &ParamView<'_>, dims: &crate::grid::GridDims) -> Self {
        let default_radius = 0.3 * dims.size_x.min(dims.size_z) as f32;
        let radius = view.float("radius", default_radius).max(0.0);
        Self {
            radius,
            thickness: view.float("thickness", 1.0).max(0.0),
            minor_radius: view.float("minorRadius", radius * 0.35).max(0.0),
            layers: view.count("layers", 3, 1, 8),
            layer_spacing: view.float("layerSpacing", 4.0),
            turns: view.float("turns", 0.3),
        }
    }
}

/// Rasterize `kind` for every pose into `field` (lit voxels are set to 1)
pub fn rasterize(kind: ShapeKind, field: &mut VoxelField, poses: &[Pose], params: &ShapeParams) {
    if kind == ShapeKind::Helix {
        rasterize_helix(field, poses, params);
        return;
    }

    let dims = field.dims();
    for z in 0..dims.size_z {
        for y in 0..dims.size_y {
            for x in 0..dims.size_x {
                let cell = Vec3::new(x as f32, y as f32, z as f32);
                let hit = poses
                    .iter()
                    .any(|pose| contains(kind, pose.local(&dims, cell), pose.scale, params));
                if hit {
                    field.set(x, y, z, 1.0);
                }
            }
        }
    }
}

/// Implicit inequality for volumetric shapes
fn contains(kind: ShapeKind, p: Vec3, scale: f32, params: &ShapeParams) -> bool {
    let r = params.radius * scale;
    let thickness = params.thickness;

    match kind {
        ShapeKind::Sphere => (p.length() - r).abs() < thickness,
        ShapeKind::Torus => {
            let from_axis = Vec2::new(p.x, p.z).length() - r;
            (from_axis * from_axis + p.y * p.y).sqrt() < params.minor_radius * scale
        }
        ShapeKind::Cube => {
            // Hollow box: inside the outer extent, outside the inner one
            let m = p.abs().max_element();
            m <= r && m >= r - thickness
        }
        ShapeKind::Pyramid => {
            if r <= 0.0 || p.y < -r || p.y > r {
                return false;
            }
            let progress = (p.y + r) / (2.0 * r);
            let cross_section = r * (1.0 - progress);
            let radial = p.x.abs().max(p.z.abs());
            (radial - cross_section).abs() < thickness
        }
        ShapeKind::Plane => {
            let layers = params.layers.max(1);
            let mid = (layers - 1) as f32 * 0.5;
            (0..layers).any(|k| {
                let offset = (k as f32 - mid) * params.layer_spacing;
                (p.y - offset).abs() < thickness
            })
        }
        ShapeKind::Helix => false,
    }
}

fn rasterize_helix(field: &mut VoxelField, poses: &[Pose], params: &ShapeParams) {
    let dims = field.dims();
    // one strand per object; trailing scroll copies reuse their object's phase
    let strands = poses.iter().map(|p| p.index + 1).max().unwrap_or(1) as f32;
    let thickness = params.thickness.max(0.5);
    let window = thickness.ceil() as i64;
    let window_x = window.min(dims.size_x as i64);
    let window_z = window.min(dims.size_z as i64);

    for y in 0..dims.size_y {
        for pose in poses {
            let height = wrap_centered(y as f32 - pose.center.y, dims.size_y as f32);
            let angle = height * params.turns + pose.angles.y + pose.index as f32 * TAU / strands;
            let r = params.radius * pose.scale;
            let px = pose.center.x + r * angle.cos();
            let pz = pose.center.z + r * angle.sin();
            let (ix, iz) = (px.round() as i64, pz.round() as i64);

            for dz in -window_z..=window_z {
                for dx in -window_x..=window_x {
                    let (cx, cz) = (ix + dx, iz + dz);
                    let d = Vec2::new(cx as f32 - px, cz as f32 - pz).length();
                    if d < thickness {
                        field.stamp_wrapped(cx, y as i64, cz, 1.0);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDims;

    fn params(radius: f32, thickness: f32) -> ShapeParams {
        ShapeParams {
            radius,
            thickness,
            minor_radius: 1.5,
            layers: 1,
            layer_spacing: 4.0,
            turns: 0.3,
        }
    }

    #[test]
    fn test_sphere_shell() {
        let dims = GridDims::new(10, 10, 10).unwrap();
        let mut field = VoxelField::new(dims);
        rasterize(
            ShapeKind::Sphere,
            &mut field,
            &[Pose::at(dims.center())],
            &params(5.0, 1.0),
        );
        assert_eq!(field.get(0, 5, 5), 1.0);
        assert_eq!(field.get(9, 5, 5), 0.0);
        assert_eq!(field.get(5, 5, 5), 0.0);
    }

    #[test]
    fn test_torus_hole_is_empty() {
        let dims = GridDims::new(20, 20, 20).unwrap();
        let mut field = VoxelField::new(dims);
        rasterize(
            ShapeKind::Torus,
            &mut field,
            &[Pose::at(dims.center())],
            &params(6.0, 1.0),
        );
        assert_eq!(field.get(10, 10, 10), 0.0);
        assert_eq!(field.get(16, 10, 10), 1.0);
    }

    #[test]
    fn test_cube_is_hollow() {
        let dims = GridDims::new(20, 20, 20).unwrap();
        let mut field = VoxelField::new(dims);
        rasterize(
            ShapeKind::Cube,
            &mut field,
            &[Pose::at(dims.center())],
            &params(6.0, 1.0),
        );
        assert_eq!(field.get(10, 10, 10), 0.0);
        assert_eq!(field.get(16, 10, 10), 1.0);
        assert_eq!(field.get(18, 10, 10), 0.0);
    }

    #[test]
    fn test_plane_single_layer() {
        let dims = GridDims::new(8, 8, 8).unwrap();
        let mut field = VoxelField::new(dims);
        rasterize(
            ShapeKind::Plane,
            &mut field,
            &[Pose::at(dims.center())],
            &params(3.0, 1.0),
        );
        // vertical distances are doubled, so exactly one layer is lit
        assert_eq!(field.active_count(), 64);
        assert_eq!(field.get(0, 4, 0), 1.0);
    }

    #[test]
    fn test_shape_wraps_across_edge() {
        let dims = GridDims::new(10, 10, 10).unwrap();
        let mut field = VoxelField::new(dims);
        rasterize(
            ShapeKind::Sphere,
            &mut field,
            &[Pose::at(Vec3::new(0.0, 5.0, 5.0))],
            &params(2.0, 0.5),
        );
        assert_eq!(field.get(2, 5, 5), 1.0);
        assert_eq!(field.get(8, 5, 5), 1.0);
    }

    #[test]
    fn test_helix_lights_every_layer() {
        let dims = GridDims::new(12, 12, 12).unwrap();
        let mut field = VoxelField::new(dims);
        rasterize(
            ShapeKind::Helix,
            &mut field,
            &[Pose::at(dims.center())],
            &params(3.0, 1.0),
        );
        for y in 0..12 {
            let lit = (0..12)
                .flat_map(|z| (0..12).map(move |x| (x, z)))
                .any(|(x, z)| field.get(x, y, z) > 0.0);
            assert!(lit, "layer {y} empty");
        }
    }

    #[test]
    fn test_helix_strands_follow_object_count_under_linear_scroll() {
        use crate::transform::{Arrangement, TransformParams, object_poses};

        let dims = GridDims::new(20, 4, 20).unwrap();
        let transform = TransformParams {
            object_count: 2,
            arrangement: Arrangement::Linear,
            scroll_speed: 3.0,
            spacing: 5.0,
            ..Default::default()
        };
        let poses = object_poses(0.3, &transform, &dims);
        assert_eq!(poses.len(), 4);

        let mut field = VoxelField::new(dims);
        let helix = ShapeParams {
            turns: 0.0,
            ..params(4.0, 0.5)
        };
        rasterize(ShapeKind::Helix, &mut field, &poses, &helix);

        // two strands sit at 0 and pi, so nothing leaves the z = 10 row
        assert!(field.active_count() > 0);
        for z in (0..20).filter(|&z| z != 10) {
            for y in 0..4 {
                for x in 0..20 {
                    assert_eq!(field.get(x, y, z), 0.0, "({x}, {y}, {z})");
                }
            }
        }
    }

    #[test]
    fn test_helix_huge_thickness_is_bounded() {
        let dims = GridDims::new(6, 3, 5).unwrap();
        let mut field = VoxelField::new(dims);
        rasterize(
            ShapeKind::Helix,
            &mut field,
            &[Pose::at(dims.center())],
            &params(2.0, 1e6),
        );
        assert_eq!(field.active_count(), dims.volume());
    }

    #[test]
    fn test_pyramid_apex_narrower_than_base() {
        let dims = GridDims::new(20, 20, 20).unwrap();
        let mut field = VoxelField::new(dims);
        rasterize(
            ShapeKind::Pyramid,
            &mut field,
            &[Pose::at(dims.center())],
            &params(8.0, 1.0),
        );
        let count_layer = |y: usize| {
            (0..20)
                .flat_map(|z| (0..20).map(move |x| (x, z)))
                .filter(|&(x, z)| field.get(x, y, z) > 0.0)
                .count()
        };
        // y offsets are doubled: layer 7 is local -6, layer 13 is local +6
        assert!(count_layer(7) > count_layer(13));
    }
}
