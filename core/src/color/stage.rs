//! Turns a scalar voxel field into an RGB frame

use super::convert::{Rgb, scale_rgb};
use super::effects::ColorEffects;
use super::mapper::ColorMapper;
use crate::grid::{GridDims, VoxelField};

/// One colored frame in voxel index order
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    dims: GridDims,
    pixels: Vec<Rgb>,
    active: usize,
}

impl Frame {
    /// All-black frame
    pub fn blank(dims: GridDims) -> Self {
        Self {
            dims,
            pixels: vec![[0, 0, 0]; dims.volume()],
            active: 0,
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Rgb {
        self.pixels[self.dims.index(x, y, z)]
    }

    /// Voxels that were lit in the source field
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Wire format: width·height·length RGB triples, 3 bytes each
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.as_flattened().to_vec()
    }
}

/// Base color, optional gradient override, then the color effect
#[derive(Debug, Clone)]
pub struct ColorStage {
    base_color: Rgb,
    mapper: Option<ColorMapper>,
    effects: ColorEffects,
}

impl ColorStage {
    pub fn new(base_color: Rgb, mapper: Option<ColorMapper>, effects: ColorEffects) -> Self {
        Self {
            base_color,
            mapper,
            effects,
        }
    }

    pub fn base_color(&self) -> Rgb {
        self.base_color
    }

    pub fn set_base_color(&mut self, color: Rgb) {
        self.base_color = color;
    }

    pub fn mapper(&self) -> Option<&ColorMapper> {
        self.mapper.as_ref()
    }

    pub fn mapper_mut(&mut self) -> Option<&mut ColorMapper> {
        self.mapper.as_mut()
    }

    pub fn effects(&self) -> &ColorEffects {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut ColorEffects {
        &mut self.effects
    }

    /// Color every lit voxel; unlit voxels stay black
    pub fn colorize(&mut self, field: &VoxelField) -> Frame {
        let dims = field.dims();
        let mut frame = Frame::blank(dims);
        for (i, &value) in field.values().iter().enumerate() {
            if value <= 0.0 {
                continue;
            }
            let (x, y, z) = dims.coords(i);
            let base = self
                .mapper
                .as_ref()
                .and_then(|m| m.color_at(x, y, z))
                .unwrap_or(self.base_color);
            let color = self.effects.apply(base, x, y, z, value);
            frame.pixels[i] = scale_rgb(color, value.min(1.0));
            frame.active += 1;
        }
        frame
    }
}
