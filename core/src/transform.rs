//! Stackable per-object transform pipeline
//!
//! A pose is a pure function of `(t, object index, params)`. Motion stages
//! are summed in a fixed order:
//!
//! 1. pulse (scale)
//! 2. translate
//! 3. orbit
//! 4. bounce
//! 5. spiral
//! 6. figure-eight
//! 7. elliptical orbit
//! 8. scroll
//! 9. rotation
//! 10. wobble (added to the rotation angles)
//!
//! Rotation is applied about the already translated center. Shapes sample
//! cells in pose-local space through [`Pose::local`].

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat3, Vec3};

use crate::grid::{GridDims, wrap_f32};
use crate::keys::keyed_enum;
use crate::params::ParamView;

/// Maximum number of objects per scene
pub const MAX_OBJECTS: usize = 16;

keyed_enum! {
    /// Direction of continuous scrolling
    pub enum ScrollDirection {
        X => "x",
        Y => "y",
        Z => "z",
        Diagonal => "diagonal",
    }
}

impl ScrollDirection {
    /// Unit vector of travel
    pub fn vector(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
            Self::Diagonal => Vec3::ONE.normalize(),
        }
    }
}

keyed_enum! {
    /// Layout of multiple objects
    pub enum Arrangement {
        Circular => "circular",
        Linear => "linear",
    }
}

/// Motion parameters shared by every geometric generator
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParams {
    /// Fractional radius swing of the pulse stage
    pub pulse_amount: f32,
    /// Pulse angular rate in radians per second
    pub pulse_speed: f32,
    /// Per-axis translation amplitude in voxels
    pub translate: Vec3,
    /// Translation oscillation rate
    pub translate_speed: f32,
    /// Horizontal circle radius in voxels
    pub orbit_radius: f32,
    /// Orbit angular rate
    pub orbit_speed: f32,
    /// Peak height of the rectified-sine bounce
    pub bounce_height: f32,
    /// Bounce rate
    pub bounce_speed: f32,
    /// Horizontal radius of the rising spiral
    pub spiral_radius: f32,
    /// Vertical swing of the rising spiral
    pub spiral_height: f32,
    /// Spiral angular rate
    pub spiral_speed: f32,
    /// Half-width of the horizontal figure-eight
    pub figure8_size: f32,
    /// Figure-eight rate
    pub figure8_speed: f32,
    /// Elliptical orbit semi-axis along X
    pub ellipse_radius_x: f32,
    /// Elliptical orbit semi-axis along Z
    pub ellipse_radius_z: f32,
    /// Elliptical orbit angular rate
    pub ellipse_speed: f32,
    /// Voxels per second
    pub scroll_speed: f32,
    /// Axis of travel for scrolling and linear arrangement
    pub scroll_direction: ScrollDirection,
    /// Static rotation in multiples of pi
    pub rotation: Vec3,
    /// Radians per second
    pub rotation_speed: f32,
    /// Spreads the Y and Z spin rates apart
    pub rotation_offset: f32,
    /// Peak wobble added to each rotation angle, in radians
    pub wobble_amount: f32,
    /// Wobble oscillation rate
    pub wobble_speed: f32,
    /// Number of objects, 1 to [`MAX_OBJECTS`]
    pub object_count: usize,
    /// Layout of multiple objects around the motion center
    pub arrangement: Arrangement,
    /// Distance between objects in voxels; zero picks a size from the grid
    pub spacing: f32,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            pulse_amount: 0.0,
            pulse_speed: 2.0,
            translate: Vec3::ZERO,
            translate_speed: 1.0,
            orbit_radius: 0.0,
            orbit_speed: 1.0,
            bounce_height: 0.0,
            bounce_speed: 2.0,
            spiral_radius: 0.0,
            spiral_height: 0.0,
            spiral_speed: 1.0,
            figure8_size: 0.0,
            figure8_speed: 1.0,
            ellipse_radius_x: 0.0,
            ellipse_radius_z: 0.0,
            ellipse_speed: 1.0,
            scroll_speed: 0.0,
            scroll_direction: ScrollDirection::X,
            rotation: Vec3::ZERO,
            rotation_speed: 0.0,
            rotation_offset: 0.0,
            wobble_amount: 0.0,
            wobble_speed: 1.0,
            object_count: 1,
            arrangement: Arrangement::Circular,
            spacing: 0.0,
        }
    }
}

impl TransformParams {
    /// Read motion parameters from a parameter view
    pub fn from_view(view: &ParamView<'_>) -> Self {
        let d = Self::default();
        Self {
            pulse_amount: view.float("pulseAmount", d.pulse_amount),
            pulse_speed: view.float("pulseSpeed", d.pulse_speed),
            translate: Vec3::new(
                view.float("translateX", 0.0),
                view.float("translateY", 0.0),
                view.float("translateZ", 0.0),
            ),
            translate_speed: view.float("translateSpeed", d.translate_speed),
            orbit_radius: view.float("orbitRadius", d.orbit_radius),
            orbit_speed: view.float("orbitSpeed", d.orbit_speed),
            bounce_height: view.float("bounceHeight", d.bounce_height),
            bounce_speed: view.float("bounceSpeed", d.bounce_speed),
            spiral_radius: view.float("spiralRadius", d.spiral_radius),
            spiral_height: view.float("spiralHeight", d.spiral_height),
            spiral_speed: view.float("spiralSpeed", d.spiral_speed),
            figure8_size: view.float("figure8Size", d.figure8_size),
            figure8_speed: view.float("figure8Speed", d.figure8_speed),
            ellipse_radius_x: view.float("ellipseRadiusX", d.ellipse_radius_x),
            ellipse_radius_z: view.float("ellipseRadiusZ", d.ellipse_radius_z),
            ellipse_speed: view.float("ellipseSpeed", d.ellipse_speed),
            scroll_speed: view.float("scrollSpeed", d.scroll_speed),
            scroll_direction: ScrollDirection::from_key_or(
                view.choice("scrollDirection", "x"),
                d.scroll_direction,
            ),
            rotation: Vec3::new(
                view.float("rotationX", 0.0),
                view.float("rotationY", 0.0),
                view.float("rotationZ", 0.0),
            ),
            rotation_speed: view.float("rotationSpeed", d.rotation_speed),
            rotation_offset: view.float("rotationOffset", d.rotation_offset),
            wobble_amount: view.float("wobbleAmount", d.wobble_amount),
            wobble_speed: view.float("wobbleSpeed", d.wobble_speed),
            object_count: view.count("objectCount", 1, 1, MAX_OBJECTS),
            arrangement: Arrangement::from_key_or(view.choice("arrangement", "circular"), d.arrangement),
            spacing: view.float("spacing", d.spacing).max(0.0),
        }
    }

    /// Whether linear scrolling renders a looped trailing set
    fn loops_linear_scroll(&self) -> bool {
        self.object_count > 1 && self.arrangement == Arrangement::Linear && self.scroll_speed != 0.0
    }

    /// Gap between objects in a linear train
    fn linear_gap(&self, dims: &GridDims) -> f32 {
        if self.spacing > 0.0 {
            return self.spacing;
        }
        let along = dims.extent().dot(self.scroll_direction.vector().abs());
        along / self.object_count.max(1) as f32
    }

    /// Radius of a circular arrangement
    fn ring_radius(&self, dims: &GridDims) -> f32 {
        if self.spacing > 0.0 {
            self.spacing
        } else {
            0.25 * dims.size_x.min(dims.size_z) as f32
        }
    }
}

/// Per-object pose for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Object index within the arrangement; trailing scroll copies repeat it
    pub index: usize,
    /// Object center in grid coordinates (unwrapped)
    pub center: Vec3,
    /// Radius multiplier from the pulse stage
    pub scale: f32,
    /// Rotation angles in radians
    pub angles: Vec3,
    /// Rotation built from `angles`
    pub rotation: Mat3,
    /// Inverse rotation (the transpose)
    pub inverse: Mat3,
    /// Displacement contributed by scrolling
    pub scroll: Vec3,
}

impl Pose {
    /// Unrotated pose at `center`
    pub fn at(center: Vec3) -> Self {
        Self {
            index: 0,
            center,
            scale: 1.0,
            angles: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
            inverse: Mat3::IDENTITY,
            scroll: Vec3::ZERO,
        }
    }

    /// Offset of `cell` from the wrapped center, in object-local space
    #[inline]
    pub fn local(&self, dims: &GridDims, cell: Vec3) -> Vec3 {
        self.inverse * dims.toroidal_delta(cell, self.center)
    }
}

/// Pose of object `index` at time `t`
pub fn compute_pose(t: f32, index: usize, params: &TransformParams, dims: &GridDims) -> Pose {
    let scroll = t * params.scroll_speed;
    pose_with_scroll(t, index, params, dims, scroll)
}

/// Poses of every object at time `t`
///
/// In linear arrangement with scrolling, the scroll distance is folded into
/// `[0, count * gap)` and a second copy trails one full train length behind,
/// so the loop has no visible seam.
pub fn object_poses(t: f32, params: &TransformParams, dims: &GridDims) -> Vec<Pose> {
    let count = params.object_count.clamp(1, MAX_OBJECTS);

    if params.loops_linear_scroll() {
        let train = params.linear_gap(dims) * count as f32;
        let folded = wrap_f32(t * params.scroll_speed, train);
        let mut poses = Vec::with_capacity(count * 2);
        for copy in 0..2 {
            let scroll = folded - copy as f32 * train;
            poses.extend((0..count).map(|i| pose_with_scroll(t, i, params, dims, scroll)));
        }
        return poses;
    }

    (0..count)
        .map(|i| compute_pose(t, i, params, dims))
        .collect()
}

fn arrangement_offset(index: usize, params: &TransformParams, dims: &GridDims) -> Vec3 {
    let count = params.object_count.max(1);
    if count == 1 {
        return Vec3::ZERO;
    }
    match params.arrangement {
        Arrangement::Circular => {
            let angle = index as f32 * TAU / count as f32;
            let r = params.ring_radius(dims);
            Vec3::new(r * angle.cos(), 0.0, r * angle.sin())
        }
        Arrangement::Linear => {
            -params.scroll_direction.vector() * (index as f32 * params.linear_gap(dims))
        }
    }
}

fn pose_with_scroll(
    t: f32,
    index: usize,
    params: &TransformParams,
    dims: &GridDims,
    scroll_distance: f32,
) -> Pose {
    let p = params;
    let mut offset = arrangement_offset(index, p, dims);

    let scale = (1.0 + p.pulse_amount * (t * p.pulse_speed).sin()).max(0.0);

    offset += p.translate * (t * p.translate_speed).sin();

    if p.orbit_radius != 0.0 {
        let a = t * p.orbit_speed;
        offset += Vec3::new(p.orbit_radius * a.cos(), 0.0, p.orbit_radius * a.sin());
    }

    offset.y += p.bounce_height * (t * p.bounce_speed).sin().abs();

    if p.spiral_radius != 0.0 || p.spiral_height != 0.0 {
        let a = t * p.spiral_speed;
        offset += Vec3::new(
            p.spiral_radius * a.cos(),
            p.spiral_height * (a * 0.5).sin(),
            p.spiral_radius * a.sin(),
        );
    }

    if p.figure8_size != 0.0 {
        // Lemniscate of Gerono in the horizontal plane
        let a = t * p.figure8_speed;
        offset.x += p.figure8_size * a.sin();
        offset.z += p.figure8_size * a.sin() * a.cos();
    }

    if p.ellipse_radius_x != 0.0 || p.ellipse_radius_z != 0.0 {
        let a = t * p.ellipse_speed;
        offset.x += p.ellipse_radius_x * a.cos();
        offset.z += p.ellipse_radius_z * a.sin();
    }

    let scroll = p.scroll_direction.vector() * scroll_distance;
    offset += scroll;

    let spin = t * p.rotation_speed;
    let mut angles = p.rotation * PI
        + Vec3::new(
            spin,
            spin * (1.0 + p.rotation_offset * 0.5),
            spin * (1.0 + p.rotation_offset),
        );

    if p.wobble_amount != 0.0 {
        let w = t * p.wobble_speed;
        angles += p.wobble_amount
            * Vec3::new(w.sin(), (w + TAU / 3.0).sin(), (w + 2.0 * TAU / 3.0).sin());
    }

    let rotation = Mat3::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);

    Pose {
        index,
        center: dims.center() + offset,
        scale,
        angles,
        rotation,
        inverse: rotation.transpose(),
        scroll,
    }
}
