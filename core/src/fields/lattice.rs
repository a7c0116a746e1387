//! Lattice scene: full volume, dot lattice, center cross, wireframe box

use crate::grid::VoxelField;
use crate::keys::keyed_enum;
use crate::params::ParamView;

keyed_enum! {
    /// Sub-pattern of the lattice scene
    pub enum LatticePattern {
        Full => "full",
        Dots => "dots",
        Cross => "cross",
        Wireframe => "wireframe",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatticeParams {
    /// 0.1..1.5 relative size
    pub size: f32,
    /// 0..1; tighter dot spacing and thicker lines when higher
    pub density: f32,
    /// Fractional size swing of the pulse
    pub pulse_amount: f32,
    /// Pulse rate in radians per second
    pub pulse_speed: f32,
}

impl LatticeParams {
    /// Read lattice parameters from the active scope
    pub fn from_view(view: &ParamView<'_>) -> Self {
        Self {
            size: view.float("size", 0.5).max(0.0),
            density: view.float("density", 0.5).clamp(0.0, 1.0),
            pulse_amount: view.float("pulseAmount", 0.0),
            pulse_speed: view.float("pulseSpeed", 1.0),
        }
    }

    fn pulse(&self, t: f32) -> f32 {
        1.0 + self.pulse_amount * 0.1 * (t * self.pulse_speed).sin()
    }
}

/// Render `pattern` into a cleared `field`
pub fn render(pattern: LatticePattern, t: f32, params: &LatticeParams, field: &mut VoxelField) {
    match pattern {
        LatticePattern::Full => field.values_mut().fill(1.0),
        LatticePattern::Dots => dots(t, params, field),
        LatticePattern::Cross => cross(t, params, field),
        LatticePattern::Wireframe => wireframe(t, params, field),
    }
}

fn dots(t: f32, p: &LatticeParams, field: &mut VoxelField) {
    let dims = field.dims();
    let spacing = ((8.0 - p.density * 6.0) as usize).max(2);
    let radius = (0.5 + p.size * 2.0) * p.pulse(t);
    let to_lattice = |v: usize| {
        let r = v % spacing;
        r.min(spacing - r) as f32
    };

    for z in 0..dims.size_z {
        for y in 0..dims.size_y {
            for x in 0..dims.size_x {
                let (dx, dy, dz) = (to_lattice(x), to_lattice(y), to_lattice(z));
                if (dx * dx + dy * dy + dz * dz).sqrt() < radius {
                    field.set(x, y, z, 1.0);
                }
            }
        }
    }
}

fn cross(t: f32, p: &LatticeParams, field: &mut VoxelField) {
    let dims = field.dims();
    let c = dims.center();
    let reach = c.min_element() * (0.3 + p.size * 0.6) * p.pulse(t);
    let thickness = 1.0 + p.density * 9.0;

    for z in 0..dims.size_z {
        for y in 0..dims.size_y {
            for x in 0..dims.size_x {
                let dx = (x as f32 - c.x).abs();
                let dy = (y as f32 - c.y).abs();
                let dz = (z as f32 - c.z).abs();
                let along_x = dy < thickness && dz < thickness && dx <= reach;
                let along_y = dx < thickness && dz < thickness && dy <= reach;
                let along_z = dx < thickness && dy < thickness && dz <= reach;
                if along_x || along_y || along_z {
                    field.set(x, y, z, 1.0);
                }
            }
        }
    }
}

fn wireframe(t: f32, p: &LatticeParams, field: &mut VoxelField) {
    let dims = field.dims();
    let factor = (0.3 + p.size * 0.65) * p.pulse(t);
    let thickness = ((1.0 + p.density * 3.0) as usize).max(1);

    let bounds = |n: usize| {
        let n_f = n as f32;
        let lo = ((n_f * (1.0 - factor) / 2.0).max(0.0) as usize).min(n.saturating_sub(1));
        let hi = ((n_f * (1.0 + factor) / 2.0) as usize).clamp(lo + 1, n);
        (lo, hi)
    };
    let bx = bounds(dims.size_x);
    let by = bounds(dims.size_y);
    let bz = bounds(dims.size_z);

    // Within `thickness` of either face of the span
    let on_face = |v: usize, (lo, hi): (usize, usize)| v < lo + thickness || v + thickness >= hi;

    for z in bz.0..bz.1 {
        for y in by.0..by.1 {
            for x in bx.0..bx.1 {
                let faces = on_face(x, bx) as u8 + on_face(y, by) as u8 + on_face(z, bz) as u8;
                if faces >= 2 {
                    field.set(x, y, z, 1.0);
                }
            }
        }
    }
}
