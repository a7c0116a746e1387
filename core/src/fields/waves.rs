//! Analytic wave fields evaluated per cell

use std::f32::consts::{PI, TAU};

use crate::grid::{GridDims, VoxelField, wrap_centered, wrap_f32};
use crate::keys::keyed_enum;
use crate::params::ParamView;
use crate::transform::ScrollDirection;

keyed_enum! {
    /// Sub-pattern of the wave-field scene
    pub enum WavePattern {
        Ripple => "ripple",
        Plane => "plane",
        Standing => "standing",
        Interference => "interference",
        Plasma => "plasma",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveParams {
    /// 0..1 fraction of the grid height
    pub amplitude: f32,
    /// Spatial cycles across the grid
    pub frequency: f32,
    /// Phase advance per second
    pub speed: f32,
    /// Band half-thickness in voxels
    pub thickness: f32,
    /// Interference source count
    pub sources: usize,
    /// Sweep axis for the plane pattern
    pub axis: ScrollDirection,
}

impl WaveParams {
    /// Read wave parameters, clamping the source count to 1..=8
    pub fn from_view(view: &ParamView<'_>) -> Self {
        Self {
            amplitude: view.float("amplitude", 0.5),
            frequency: view.float("frequency", 1.0),
            speed: view.float("speed", 1.0),
            thickness: view.float("thickness", 1.0).max(0.0),
            sources: view.count("sources", 3, 1, 8),
            axis: ScrollDirection::from_key_or(view.choice("axis", "y"), ScrollDirection::Y),
        }
    }
}

/// Render `pattern` into a cleared `field`
pub fn render(pattern: WavePattern, t: f32, params: &WaveParams, field: &mut VoxelField) {
    match pattern {
        WavePattern::Ripple => ripple(t, params, field),
        WavePattern::Plane => plane_sweep(t, params, field),
        WavePattern::Standing => standing(t, params, field),
        WavePattern::Interference => interference(t, params, field),
        WavePattern::Plasma => plasma(t, params, field),
    }
}

/// Light a band of half-thickness `thickness` around height `h` in column (x, z)
fn band(field: &mut VoxelField, x: usize, z: usize, h: f32, thickness: f32) {
    for y in 0..field.dims().size_y {
        if (y as f32 - h).abs() < thickness {
            field.set(x, y, z, 1.0);
        }
    }
}

fn ripple(t: f32, p: &WaveParams, field: &mut VoxelField) {
    let dims = field.dims();
    let c = dims.center();
    let sy = dims.size_y as f32;
    for z in 0..dims.size_z {
        for x in 0..dims.size_x {
            let d = ((x as f32 - c.x).powi(2) + (z as f32 - c.z).powi(2)).sqrt();
            let h = sy * 0.5 + p.amplitude * sy * 0.5 * (d * p.frequency * 0.5 - t * p.speed).sin();
            band(field, x, z, h, p.thickness);
        }
    }
}

fn plane_sweep(t: f32, p: &WaveParams, field: &mut VoxelField) {
    let dims = field.dims();
    let extent = dims.extent();
    let (axis, u_axis) = match p.axis {
        ScrollDirection::X => (0, 2),
        ScrollDirection::Z => (2, 0),
        ScrollDirection::Y | ScrollDirection::Diagonal => (1, 0),
    };
    let along = extent[axis];
    let pos = wrap_f32(t * p.speed * along * 0.25, along);

    for z in 0..dims.size_z {
        for y in 0..dims.size_y {
            for x in 0..dims.size_x {
                let cell = [x as f32, y as f32, z as f32];
                let offset =
                    p.amplitude * 2.0 * (cell[u_axis] * p.frequency * 0.3 + t * p.speed).sin();
                let d = wrap_centered(cell[axis] - pos - offset, along);
                if d.abs() < p.thickness {
                    field.set(x, y, z, 1.0);
                }
            }
        }
    }
}

/// Per-axis sine tables of the standing wave
pub fn standing_tables(dims: &GridDims, frequency: f32) -> (Vec<f32>, Vec<f32>) {
    let table = |n: usize| {
        (0..n)
            .map(|i| (i as f32 * frequency * PI / n as f32).sin())
            .collect::<Vec<_>>()
    };
    (table(dims.size_x), table(dims.size_z))
}

fn standing(t: f32, p: &WaveParams, field: &mut VoxelField) {
    let dims = field.dims();
    let (sin_x, sin_z) = standing_tables(&dims, p.frequency);
    let time = (t * p.speed).sin();
    let top = dims.size_y - 1;

    for (z, sz) in sin_z.iter().enumerate() {
        for (x, sx) in sin_x.iter().enumerate() {
            let v = (1.0 + sx * sz * time) * 0.5 * p.amplitude;
            if v > 0.5 {
                field.fill_column(x, z, 1.0);
            } else {
                let y = ((v * dims.size_y as f32).floor().max(0.0) as usize).min(top);
                field.set(x, y, z, 1.0);
            }
        }
    }
}

fn interference(t: f32, p: &WaveParams, field: &mut VoxelField) {
    let dims = field.dims();
    let c = dims.center();
    let ring = 0.3 * dims.size_x.min(dims.size_z) as f32;
    let n = p.sources.max(1);
    let sources: Vec<(f32, f32)> = (0..n)
        .map(|k| {
            let a = k as f32 * TAU / n as f32;
            (c.x + ring * a.cos(), c.z + ring * a.sin())
        })
        .collect();
    let sy = dims.size_y as f32;

    for z in 0..dims.size_z {
        for x in 0..dims.size_x {
            let sum: f32 = sources
                .iter()
                .map(|&(sx, sz)| {
                    let d = ((x as f32 - sx).powi(2) + (z as f32 - sz).powi(2)).sqrt();
                    (d * p.frequency * 0.5 - t * p.speed).sin()
                })
                .sum::<f32>()
                / n as f32;
            let h = sy * 0.5 + p.amplitude * sy * 0.4 * sum;
            band(field, x, z, h, p.thickness);
        }
    }
}

fn plasma(t: f32, p: &WaveParams, field: &mut VoxelField) {
    let dims = field.dims();
    let extent = dims.extent();
    let threshold = 1.0 - p.amplitude.clamp(0.0, 1.0) * 0.5;
    let ts = t * p.speed;
    let f = p.frequency;

    for z in 0..dims.size_z {
        for y in 0..dims.size_y {
            for x in 0..dims.size_x {
                let nx = x as f32 / extent.x;
                let ny = y as f32 / extent.y;
                let nz = z as f32 / extent.z;
                let v = ((nx * 10.0 * f + ts).sin()
                    + (ny * 10.0 * f - ts * 0.7).sin()
                    + ((nx + ny + nz) * 8.0 * f + ts * 0.5).sin()
                    + (((nx - 0.5).powi(2) + (nz - 0.5).powi(2)).sqrt() * 20.0 * f + ts).sin())
                    / 4.0;
                let level = (v + 1.0) * 0.5;
                if level > threshold {
                    field.set(x, y, z, level);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;

    fn params() -> WaveParams {
        WaveParams::from_view(&ParameterSet::new().view("waveField"))
    }

    #[test]
    fn test_every_pattern_lights_something() {
        let dims = GridDims::new(12, 12, 12).unwrap();
        for &pattern in WavePattern::ALL {
            let mut field = VoxelField::new(dims);
            render(pattern, 0.7, &params(), &mut field);
            assert!(field.active_count() > 0, "{pattern}");
        }
    }

    #[test]
    fn test_ripple_flat_at_zero_amplitude() {
        let dims = GridDims::new(8, 10, 8).unwrap();
        let mut field = VoxelField::new(dims);
        let flat = WaveParams {
            amplitude: 0.0,
            ..params()
        };
        render(WavePattern::Ripple, 1.0, &flat, &mut field);
        // only the middle layer sits within the band
        assert_eq!(field.active_count(), 64);
        assert_eq!(field.get(3, 5, 3), 1.0);
    }

    #[test]
    fn test_standing_low_amplitude_one_voxel_per_column() {
        let dims = GridDims::new(6, 6, 6).unwrap();
        let mut field = VoxelField::new(dims);
        let quiet = WaveParams {
            amplitude: 0.4,
            ..params()
        };
        render(WavePattern::Standing, 1.0, &quiet, &mut field);
        assert_eq!(field.active_count(), 36);
    }

    #[test]
    fn test_plane_sweep_moves() {
        let dims = GridDims::new(8, 8, 8).unwrap();
        let p = WaveParams {
            amplitude: 0.0,
            ..params()
        };
        let mut a = VoxelField::new(dims);
        let mut b = VoxelField::new(dims);
        render(WavePattern::Plane, 0.0, &p, &mut a);
        render(WavePattern::Plane, 1.0, &p, &mut b);
        assert_ne!(a, b);
        assert_eq!(a.active_count(), b.active_count());
    }
}
