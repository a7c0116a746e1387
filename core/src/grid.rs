//! Voxel grid dimensions, the dense brightness field, and toroidal wrapping
//!
//! The field is stored x-fastest: `index = x + y * size_x + z * size_x * size_y`.

use glam::Vec3;

use crate::error::ConfigError;

/// Default vertical distance multiplier (vertical voxel pitch is half the
/// horizontal pitch on the reference hardware)
pub const DEFAULT_VERTICAL_SCALE: f32 = 2.0;

/// Fixed grid dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDims {
    /// Width (X extent)
    pub size_x: usize,
    /// Height (Y extent, vertical)
    pub size_y: usize,
    /// Length (Z extent)
    pub size_z: usize,
    /// Multiplier applied to vertical distances before comparison
    pub vertical_scale: f32,
}

impl GridDims {
    /// Create validated dimensions with the default vertical scale
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Result<Self, ConfigError> {
        Self::with_vertical_scale(size_x, size_y, size_z, DEFAULT_VERTICAL_SCALE)
    }

    /// Create validated dimensions with an explicit vertical scale
    pub fn with_vertical_scale(
        size_x: usize,
        size_y: usize,
        size_z: usize,
        vertical_scale: f32,
    ) -> Result<Self, ConfigError> {
        for (axis, size) in [("x", size_x), ("y", size_y), ("z", size_z)] {
            if size == 0 {
                return Err(ConfigError::ZeroDimension { axis });
            }
        }
        if !(vertical_scale.is_finite() && vertical_scale > 0.0) {
            return Err(ConfigError::InvalidVerticalScale(vertical_scale));
        }
        Ok(Self {
            size_x,
            size_y,
            size_z,
            vertical_scale,
        })
    }

    /// Total voxel count
    #[inline]
    pub fn volume(&self) -> usize {
        self.size_x * self.size_y * self.size_z
    }

    /// Linear index of (x, y, z)
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.size_x + z * self.size_x * self.size_y
    }

    /// Inverse of [`GridDims::index`]
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        let x = index % self.size_x;
        let y = (index / self.size_x) % self.size_y;
        let z = index / (self.size_x * self.size_y);
        (x, y, z)
    }

    /// Extents as floats
    #[inline]
    pub fn extent(&self) -> Vec3 {
        Vec3::new(self.size_x as f32, self.size_y as f32, self.size_z as f32)
    }

    /// Geometric center of the grid
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.extent() * 0.5
    }

    /// Index of an integer coordinate wrapped onto the torus
    #[inline]
    pub fn wrapped_index(&self, x: i64, y: i64, z: i64) -> usize {
        let x = wrap_i64(x, self.size_x as i64) as usize;
        let y = wrap_i64(y, self.size_y as i64) as usize;
        let z = wrap_i64(z, self.size_z as i64) as usize;
        self.index(x, y, z)
    }

    /// Shortest toroidal offset from `center` to `point`, with the vertical
    /// component multiplied by `vertical_scale`
    #[inline]
    pub fn toroidal_delta(&self, point: Vec3, center: Vec3) -> Vec3 {
        let extent = self.extent();
        let d = point - center;
        Vec3::new(
            wrap_centered(d.x, extent.x),
            wrap_centered(d.y, extent.y) * self.vertical_scale,
            wrap_centered(d.z, extent.z),
        )
    }
}

/// `((v % n) + n) % n` for integers; always lands in `[0, n)`
#[inline]
pub fn wrap_i64(v: i64, n: i64) -> i64 {
    ((v % n) + n) % n
}

/// `((v % n) + n) % n` for floats; lands in `[0, n)`
#[inline]
pub fn wrap_f32(v: f32, n: f32) -> f32 {
    if n <= 0.0 {
        return v;
    }
    let w = ((v % n) + n) % n;
    // -0.0 and values that round up to n collapse to 0
    if w >= n { 0.0 } else { w }
}

/// Wrap an offset into `[-n/2, n/2)`
#[inline]
pub fn wrap_centered(d: f32, n: f32) -> f32 {
    if n <= 0.0 {
        return d;
    }
    wrap_f32(d + n * 0.5, n) - n * 0.5
}

/// Dense scalar brightness field owned by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelField {
    dims: GridDims,
    values: Vec<f32>,
}

impl VoxelField {
    /// Create a field with every voxel off
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            values: vec![0.0; dims.volume()],
        }
    }

    /// Grid dimensions
    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Raw values in index order
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Mutable raw values in index order
    #[inline]
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Turn every voxel off
    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }

    /// Value at (x, y, z)
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.values[self.dims.index(x, y, z)]
    }

    /// Overwrite the value at (x, y, z)
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) {
        let idx = self.dims.index(x, y, z);
        self.values[idx] = value;
    }

    /// Keep the brighter of the current value and `value` at a wrapped coordinate
    #[inline]
    pub fn stamp_wrapped(&mut self, x: i64, y: i64, z: i64, value: f32) {
        let idx = self.dims.wrapped_index(x, y, z);
        if value > self.values[idx] {
            self.values[idx] = value;
        }
    }

    /// Fill a whole vertical column
    pub fn fill_column(&mut self, x: usize, z: usize, value: f32) {
        for y in 0..self.dims.size_y {
            self.set(x, y, z, value);
        }
    }

    /// Number of voxels with a positive value
    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|&&v| v > 0.0).count()
    }
}
