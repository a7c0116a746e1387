//! Spatial gradients that override the base color per voxel

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::convert::{Rgb, lerp_rgb};
use crate::error::ConfigError;
use crate::grid::GridDims;

/// Shape of the gradient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Along one axis
    #[default]
    Linear,
    /// Euclidean distance from the origin
    Radial,
    /// Distance from a line through the origin parallel to the axis
    Cylindrical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Curve applied to the normalized gradient position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Falloff {
    #[default]
    Linear,
    Quadratic,
    Cubic,
    Smoothstep,
}

impl Falloff {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Quadratic => t * t,
            Self::Cubic => t * t * t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position in [0, 1]
    pub position: f32,
    pub color: Rgb,
}

impl ColorStop {
    pub fn new(position: f32, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Gradient settings as stored in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub kind: GradientKind,
    pub axis: Axis,
    /// Origin in normalized grid coordinates
    pub origin: [f32; 3],
    pub falloff: Falloff,
    pub stops: Vec<ColorStop>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            axis: Axis::Y,
            origin: [0.5, 0.5, 0.5],
            falloff: Falloff::Linear,
            stops: vec![
                ColorStop::new(0.0, [255, 0, 64]),
                ColorStop::new(1.0, [0, 128, 255]),
            ],
        }
    }
}

/// Validated, sorted color stops
pub fn sorted_stops(stops: &[ColorStop]) -> Result<Vec<ColorStop>, ConfigError> {
    if stops.is_empty() {
        return Err(ConfigError::EmptyColorStops);
    }
    if let Some(bad) = stops
        .iter()
        .find(|s| !(0.0..=1.0).contains(&s.position))
    {
        return Err(ConfigError::StopOutOfRange(bad.position));
    }
    let mut sorted = stops.to_vec();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));
    Ok(sorted)
}

/// Color at `t` between the two stops that bracket it
///
/// `stops` must be sorted and non-empty; positions outside the stop range
/// take the nearest end color.
pub fn interpolate_stops(stops: &[ColorStop], t: f32) -> Rgb {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0, 0, 0];
    };
    if t <= first.position {
        return first.color;
    }
    if t >= last.position {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.position && t <= b.position {
            let range = b.position - a.position;
            if range <= f32::EPSILON {
                return a.color;
            }
            return lerp_rgb(a.color, b.color, (t - a.position) / range);
        }
    }
    last.color
}

/// Gradient evaluator with cached grid-space origin and normalizer
#[derive(Debug, Clone)]
pub struct ColorMapper {
    dims: GridDims,
    kind: GradientKind,
    axis: Axis,
    falloff: Falloff,
    stops: Vec<ColorStop>,
    enabled: bool,
    origin_normalized: Vec3,
    origin: Vec3,
    max_distance: f32,
}

impl ColorMapper {
    pub fn new(dims: GridDims, config: &GradientConfig) -> Result<Self, ConfigError> {
        let mut mapper = Self {
            dims,
            kind: config.kind,
            axis: config.axis,
            falloff: config.falloff,
            stops: sorted_stops(&config.stops)?,
            enabled: true,
            origin_normalized: Vec3::from_array(config.origin).clamp(Vec3::ZERO, Vec3::ONE),
            origin: Vec3::ZERO,
            max_distance: 0.0,
        };
        mapper.recompute();
        Ok(mapper)
    }

    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Origin in grid coordinates
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Distance from the origin to the farthest relevant corner
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled mapper yields no override
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_kind(&mut self, kind: GradientKind) {
        if kind != self.kind {
            self.kind = kind;
            self.recompute();
        }
    }

    pub fn set_axis(&mut self, axis: Axis) {
        if axis != self.axis {
            self.axis = axis;
            self.recompute();
        }
    }

    pub fn set_falloff(&mut self, falloff: Falloff) {
        self.falloff = falloff;
    }

    /// Move the origin (normalized grid coordinates)
    pub fn set_origin(&mut self, origin: Vec3) {
        let origin = origin.clamp(Vec3::ZERO, Vec3::ONE);
        if origin != self.origin_normalized {
            self.origin_normalized = origin;
            self.recompute();
        }
    }

    pub fn set_stops(&mut self, stops: &[ColorStop]) -> Result<(), ConfigError> {
        self.stops = sorted_stops(stops)?;
        Ok(())
    }

    fn last_cell(&self) -> Vec3 {
        (self.dims.extent() - Vec3::ONE).max(Vec3::ZERO)
    }

    fn recompute(&mut self) {
        let last = self.last_cell();
        self.origin = self.origin_normalized * last;
        self.max_distance = (0..8)
            .map(|i| {
                let corner = Vec3::new(
                    if i & 1 == 0 { 0.0 } else { last.x },
                    if i & 2 == 0 { 0.0 } else { last.y },
                    if i & 4 == 0 { 0.0 } else { last.z },
                );
                self.distance(corner)
            })
            .fold(0.0, f32::max);
        debug!(
            kind = ?self.kind,
            origin = ?self.origin,
            max_distance = self.max_distance,
            "gradient cache updated"
        );
    }

    fn distance(&self, p: Vec3) -> f32 {
        let d = p - self.origin;
        match self.kind {
            GradientKind::Linear | GradientKind::Radial => d.length(),
            GradientKind::Cylindrical => {
                let mut planar = d;
                planar[self.axis.index()] = 0.0;
                planar.length()
            }
        }
    }

    /// Normalized gradient position in [0, 1] before the falloff curve
    pub fn position(&self, x: usize, y: usize, z: usize) -> f32 {
        let p = Vec3::new(x as f32, y as f32, z as f32);
        let t = match self.kind {
            GradientKind::Linear => {
                let axis = self.axis.index();
                let span = self.last_cell()[axis];
                if span > 0.0 { p[axis] / span } else { 0.0 }
            }
            GradientKind::Radial | GradientKind::Cylindrical => {
                if self.max_distance > 0.0 {
                    self.distance(p) / self.max_distance
                } else {
                    0.0
                }
            }
        };
        t.clamp(0.0, 1.0)
    }

    /// Gradient color at a voxel, `None` when disabled
    pub fn color_at(&self, x: usize, y: usize, z: usize) -> Option<Rgb> {
        if !self.enabled {
            return None;
        }
        let t = self.falloff.apply(self.position(x, y, z));
        Some(interpolate_stops(&self.stops, t))
    }
}
