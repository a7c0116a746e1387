//! Optical illusion scene: receding corridor frames, waterfall stripes,
//! a Pulfrich ring and rotating moire grids
//!
//! Every pattern writes only in-bounds voxels; nothing wraps.

use std::f32::consts::TAU;

use crate::grid::VoxelField;
use crate::keys::keyed_enum;
use crate::params::ParamView;

/// Objects on the Pulfrich ring
const PULFRICH_OBJECTS: usize = 8;
/// Ring objects at or below this brightness are not drawn
const PULFRICH_CUTOFF: f32 = 0.3;
/// Marker rows of the waterfall repeat every this many layers
const WATERFALL_MARKER_STEP: usize = 5;

keyed_enum! {
    /// Sub-pattern of the illusions scene
    pub enum IllusionPattern {
        InfiniteCorridor => "infiniteCorridor",
        Waterfall => "waterfallIllusion",
        Pulfrich => "pulfrich",
        Moire => "moirePattern",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IllusionParams {
    /// Frame count and object size (range: 0-3)
    pub size: f32,
    /// Frame, stripe and grid spacing; ring radius for Pulfrich (range: 0-1)
    pub density: f32,
}

impl IllusionParams {
    /// Read and clamp illusion parameters
    pub fn from_view(view: &ParamView<'_>) -> Self {
        Self {
            size: view.float("size", 1.0).clamp(0.0, 3.0),
            density: view.float("density", 0.0).clamp(0.0, 1.0),
        }
    }
}

/// Render `pattern` into a cleared `field`
pub fn render(pattern: IllusionPattern, t: f32, params: &IllusionParams, field: &mut VoxelField) {
    match pattern {
        IllusionPattern::InfiniteCorridor => corridor(t, params, field),
        IllusionPattern::Waterfall => waterfall(t, params, field),
        IllusionPattern::Pulfrich => pulfrich(t, params, field),
        IllusionPattern::Moire => moire(t, params, field),
    }
}

fn set_in_bounds(field: &mut VoxelField, x: i64, y: i64, z: i64) {
    let dims = field.dims();
    let inside = |v: i64, n: usize| v >= 0 && (v as usize) < n;
    if inside(x, dims.size_x) && inside(y, dims.size_y) && inside(z, dims.size_z) {
        field.set(x as usize, y as usize, z as usize, 1.0);
    }
}

/// Rectangular frames rising through the height, growing as they climb
fn corridor(t: f32, p: &IllusionParams, field: &mut VoxelField) {
    let dims = field.dims();
    let spacing = ((4.0 * (1.0 + p.density)) as usize).max(3);
    let frames = ((5.0 + p.size * 5.0) as usize).max(1);
    let cycle = (spacing * frames) as f32;
    let scroll = t * 3.0;
    let (cx, cz) = ((dims.size_x / 2) as i64, (dims.size_z / 2) as i64);

    // Twice the frame count so the loop seam is always covered
    for frame in 0..frames * 2 {
        let base_y = (frame as f32 * spacing as f32 - scroll).rem_euclid(cycle);
        let y = (base_y as usize % dims.size_y) as i64;
        let scale = 0.2 + base_y / cycle * 0.8 * p.size;
        let half_w = ((dims.size_x as f32 / 2.0 * scale) as usize).clamp(1, dims.size_x) as i64;
        let half_d = ((dims.size_z as f32 / 2.0 * scale) as usize).clamp(1, dims.size_z) as i64;

        for dx in -half_w..=half_w {
            set_in_bounds(field, cx + dx, y, cz - half_d);
            set_in_bounds(field, cx + dx, y, cz + half_d);
        }
        for dz in -half_d..=half_d {
            set_in_bounds(field, cx - half_w, y, cz + dz);
            set_in_bounds(field, cx + half_w, y, cz + dz);
        }
    }
}

/// Depth slices sweeping along Z against fixed horizontal marker layers
fn waterfall(t: f32, p: &IllusionParams, field: &mut VoxelField) {
    let dims = field.dims();
    let offset = t * 10.0;
    let stripe = ((5.0 - p.density * 3.0) as usize).max(2) as f32;

    for z in 0..dims.size_z {
        if (z as f32 + offset).rem_euclid(stripe * 2.0) < stripe {
            for y in 0..dims.size_y {
                for x in 0..dims.size_x {
                    field.set(x, y, z, 1.0);
                }
            }
        }
    }

    for y in (0..dims.size_y).step_by(WATERFALL_MARKER_STEP) {
        for z in 0..dims.size_z {
            for x in 0..dims.size_x {
                field.set(x, y, z, 1.0);
            }
        }
    }
}

/// Ring of spheres turning in the XY plane; the dim half of the ring drops out
fn pulfrich(t: f32, p: &IllusionParams, field: &mut VoxelField) {
    let dims = field.dims();
    let c = dims.center();
    let radius = 6.0 + p.density * 12.0;
    let reach = ((1.0 + p.size * 2.0) as i64).max(1);

    for i in 0..PULFRICH_OBJECTS {
        let angle = t + i as f32 / PULFRICH_OBJECTS as f32 * TAU;
        let brightness = 0.5 + 0.5 * angle.sin();
        if brightness <= PULFRICH_CUTOFF {
            continue;
        }

        let px = (c.x + angle.cos() * radius) as i64;
        let py = (c.y + angle.sin() * radius) as i64;
        let pz = c.z as i64;
        for dz in -reach..=reach {
            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    if dx * dx + dy * dy + dz * dz <= reach * reach {
                        set_in_bounds(field, px + dx, py + dy, pz + dz);
                    }
                }
            }
        }
    }
}

/// Fixed X grid overlaid with a copy slowly rotating about the vertical axis
fn moire(t: f32, p: &IllusionParams, field: &mut VoxelField) {
    let dims = field.dims();
    let spacing = ((3.0 * (1.0 + p.density)) as usize).max(2);
    let (sin, cos) = (t * 0.1).sin_cos();
    let c = dims.center();

    for z in 0..dims.size_z {
        for x in 0..dims.size_x {
            let rx = (x as f32 - c.x) * cos - (z as f32 - c.z) * sin;
            if x % spacing == 0 || (rx.abs() as usize) % spacing == 0 {
                field.fill_column(x, z, 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDims;
    use crate::params::ParameterSet;

    fn params() -> IllusionParams {
        IllusionParams::from_view(&ParameterSet::new().view("illusions"))
    }

    fn layer_count(field: &VoxelField, y: usize) -> usize {
        let dims = field.dims();
        (0..dims.size_z)
            .flat_map(|z| (0..dims.size_x).map(move |x| (x, z)))
            .filter(|&(x, z)| field.get(x, y, z) > 0.0)
            .count()
    }

    #[test]
    fn test_params_clamped() {
        let set = ParameterSet::new()
            .with_scene("size", 100.0)
            .with_scene("density", -4.0);
        let p = IllusionParams::from_view(&set.view("illusions"));
        assert_eq!(p.size, 3.0);
        assert_eq!(p.density, 0.0);
    }

    #[test]
    fn test_corridor_nested_frames() {
        // spacing 4 and 10 frames: rows 0, 4, 8, 12 and 16 carry frames
        let dims = GridDims::new(20, 20, 20).unwrap();
        let mut field = VoxelField::new(dims);
        render(IllusionPattern::InfiniteCorridor, 0.0, &params(), &mut field);

        // row 0 holds the nearest frame (half width 2) and a mid frame (half width 6)
        assert_eq!(field.get(8, 0, 8), 1.0);
        assert_eq!(field.get(4, 0, 4), 1.0);
        assert_eq!(field.get(10, 0, 10), 0.0);
        assert_eq!(layer_count(&field, 1), 0);
        assert!(layer_count(&field, 4) > 0);
    }

    #[test]
    fn test_waterfall_stripes_and_markers() {
        let dims = GridDims::new(6, 12, 20).unwrap();
        let mut field = VoxelField::new(dims);
        render(IllusionPattern::Waterfall, 0.0, &params(), &mut field);
        // stripe width 5, period 10
        assert_eq!(field.get(3, 1, 2), 1.0);
        assert_eq!(field.get(3, 1, 7), 0.0);
        assert_eq!(field.get(3, 5, 7), 1.0);
        assert_eq!(field.get(3, 1, 12), 1.0);
    }

    #[test]
    fn test_waterfall_stripes_move() {
        let dims = GridDims::new(4, 3, 20).unwrap();
        let mut a = VoxelField::new(dims);
        let mut b = VoxelField::new(dims);
        render(IllusionPattern::Waterfall, 0.0, &params(), &mut a);
        render(IllusionPattern::Waterfall, 0.25, &params(), &mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_pulfrich_dim_half_dropped() {
        let dims = GridDims::new(40, 40, 40).unwrap();
        let mut field = VoxelField::new(dims);
        render(IllusionPattern::Pulfrich, 0.0, &params(), &mut field);
        // bright top of the ring is drawn, the dark bottom is not
        assert_eq!(field.get(26, 20, 20), 1.0);
        assert_eq!(field.get(20, 26, 20), 1.0);
        assert_eq!(field.get(20, 14, 20), 0.0);
    }

    #[test]
    fn test_moire_static_grid_at_start() {
        let dims = GridDims::new(12, 4, 12).unwrap();
        let mut field = VoxelField::new(dims);
        render(IllusionPattern::Moire, 0.0, &params(), &mut field);
        for y in 0..4 {
            for z in 0..12 {
                assert_eq!(field.get(3, y, z), 1.0);
                assert_eq!(field.get(1, y, z), 0.0);
            }
        }
    }

    #[test]
    fn test_tiny_grid_stays_in_bounds() {
        let dims = GridDims::new(1, 1, 1).unwrap();
        let mut field = VoxelField::new(dims);
        let p = IllusionParams {
            size: 3.0,
            density: 1.0,
        };
        for &pattern in IllusionPattern::ALL {
            field.clear();
            render(pattern, 2.7, &p, &mut field);
            assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
