//! Thresholded noise volumes and orbiting cellular walls

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::grid::{GridDims, VoxelField, wrap_f32};
use crate::keys::keyed_enum;
use crate::noise::{FbmConfig, Perlin3};
use crate::params::ParamView;

keyed_enum! {
    /// Sub-pattern of the procedural scene
    pub enum ProceduralPattern {
        Noise => "noise",
        Fbm => "fbm",
        Cellular => "cellular",
    }
}

keyed_enum! {
    /// Axis the noise volume drifts along over time
    pub enum ScrollAxis {
        None => "none",
        X => "x",
        Y => "y",
        Z => "z",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProceduralParams {
    /// Noise-space units per voxel
    pub scale: f32,
    /// Cells with noise above this value are lit
    pub threshold: f32,
    /// Light cells below the threshold instead
    pub invert: bool,
    /// Fractal octaves for the fbm pattern (range: 1-8)
    pub octaves: u32,
    /// Drift and orbit rate multiplier
    pub speed: f32,
    /// Axis the noise volume drifts along
    pub scroll_axis: ScrollAxis,
    /// Number of cellular seeds
    pub cells: usize,
    /// Cellular shell radius in voxels
    pub cell_radius: f32,
    /// Cellular wall thickness in voxels
    pub wall: f32,
}

impl ProceduralParams {
    /// Read procedural parameters from the active scope
    pub fn from_view(view: &ParamView<'_>) -> Self {
        Self {
            scale: view.float("scale", 0.1),
            threshold: view.float("threshold", 0.2),
            invert: view.flag("invert", false),
            octaves: view.count("octaves", 4, 1, 8) as u32,
            speed: view.float("speed", 1.0),
            scroll_axis: ScrollAxis::from_key_or(view.choice("scrollAxis", "z"), ScrollAxis::Z),
            cells: view.count("cells", 8, 3, 20),
            cell_radius: view.float("cellRadius", 6.0).max(0.0),
            wall: view.float("wall", 1.5).max(0.0),
        }
    }

    fn time_offset(&self, t: f32) -> Vec3 {
        let d = t * self.speed * 0.5;
        match self.scroll_axis {
            ScrollAxis::None => Vec3::ZERO,
            ScrollAxis::X => Vec3::new(d, 0.0, 0.0),
            ScrollAxis::Y => Vec3::new(0.0, d, 0.0),
            ScrollAxis::Z => Vec3::new(0.0, 0.0, d),
        }
    }
}

/// Render a thresholded noise volume; single octave unless `fractal`
pub fn render_noise(
    noise: &Perlin3,
    fractal: bool,
    t: f32,
    params: &ProceduralParams,
    field: &mut VoxelField,
) {
    let dims = field.dims();
    let fbm = FbmConfig::with_octaves(if fractal { params.octaves } else { 1 });
    let offset = params.time_offset(t);

    for z in 0..dims.size_z {
        for y in 0..dims.size_y {
            for x in 0..dims.size_x {
                let p = Vec3::new(x as f32, y as f32, z as f32) * params.scale + offset;
                let v = fbm.sample(noise, p);
                let lit = if params.invert {
                    v < params.threshold
                } else {
                    v > params.threshold
                };
                if lit {
                    field.set(x, y, z, 1.0);
                }
            }
        }
    }
}

/// Seed points for the cellular pattern
#[derive(Debug, Clone, PartialEq)]
pub struct CellField {
    seeds: Vec<Vec3>,
}

impl CellField {
    /// Place `count` seeds uniformly in the grid using `rng`
    pub fn new<R: Rng + ?Sized>(dims: &GridDims, count: usize, rng: &mut R) -> Self {
        let extent = dims.extent();
        let seeds = (0..count)
            .map(|_| {
                Vec3::new(
                    rng.random::<f32>() * extent.x,
                    rng.random::<f32>() * extent.y,
                    rng.random::<f32>() * extent.z,
                )
            })
            .collect();
        Self { seeds }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Seed centers at time `t`, each orbiting its origin
    pub fn centers(&self, dims: &GridDims, t: f32, speed: f32) -> Vec<Vec3> {
        let n = self.seeds.len().max(1) as f32;
        let extent = dims.extent();
        self.seeds
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let angle = t * speed * 0.5 + i as f32 * TAU / n;
                let orbit = 3.0 + (i % 5) as f32;
                Vec3::new(
                    wrap_f32(s.x + angle.cos() * orbit, extent.x),
                    wrap_f32(s.y + (angle * 0.7).sin() * orbit, extent.y),
                    wrap_f32(s.z + (angle * 0.5).sin() * orbit, extent.z),
                )
            })
            .collect()
    }
}

/// Render hollow cell walls around each orbiting seed
pub fn render_cellular(cells: &CellField, t: f32, params: &ProceduralParams, field: &mut VoxelField) {
    let dims = field.dims();
    let centers = cells.centers(&dims, t, params.speed);
    let outer = params.cell_radius;
    let inner = outer - params.wall;

    for z in 0..dims.size_z {
        for y in 0..dims.size_y {
            for x in 0..dims.size_x {
                let cell = Vec3::new(x as f32, y as f32, z as f32);
                let hit = centers.iter().any(|&c| {
                    let d = dims.toroidal_delta(cell, c).length();
                    d < outer && d > inner
                });
                if hit {
                    field.set(x, y, z, 1.0);
                }
            }
        }
    }
}
