//! Stateful point generators with boundary recycling
//!
//! Particles move along one axis. A particle leaving the grid is recycled to
//! the opposite boundary plane with fresh random transverse coordinates, so
//! the population size never changes between `init` calls.

use glam::Vec3;
use rand::Rng;

use crate::grid::GridDims;

/// Axis a particle system flows along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAxis {
    X,
    Y,
    Z,
}

impl FlowAxis {
    #[inline]
    fn component(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// A single moving point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Per-particle speed multiplier
    pub speed: f32,
}

/// A population of particles flowing along one axis
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    dims: GridDims,
    base_count: usize,
    axis: FlowAxis,
    /// +1.0 flows toward the far plane, -1.0 toward zero
    direction: f32,
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Create an empty system; call [`ParticleSystem::init`] to populate it
    pub fn new(dims: GridDims, base_count: usize, axis: FlowAxis, direction: f32) -> Self {
        Self {
            dims,
            base_count,
            axis,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            particles: Vec::new(),
        }
    }

    /// Downward flow along Y
    pub fn falling(dims: GridDims, base_count: usize) -> Self {
        Self::new(dims, base_count, FlowAxis::Y, -1.0)
    }

    /// Sideways flow along X
    pub fn drifting(dims: GridDims, base_count: usize) -> Self {
        Self::new(dims, base_count, FlowAxis::X, 1.0)
    }

    /// Reallocate `floor(base_count * density)` particles at random positions
    pub fn init<R: Rng + ?Sized>(&mut self, density: f32, rng: &mut R) {
        let density = if density.is_finite() { density.max(0.0) } else { 0.0 };
        let count = (self.base_count as f32 * density).floor() as usize;
        let extent = self.dims.extent();

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let position = Vec3::new(
                random_coord(rng, extent.x),
                random_coord(rng, extent.y),
                random_coord(rng, extent.z),
            );
            let speed = rng.random_range(0.5..1.5);
            self.particles.push(Particle { position, speed });
        }
    }

    /// Advance every particle by `speed * particle.speed` along the flow axis
    pub fn update<R: Rng + ?Sized>(&mut self, speed: f32, rng: &mut R) {
        let axis = self.axis.component();
        let extent = self.dims.extent();
        let limit = extent[axis];
        let step = if speed.is_finite() { speed } else { 0.0 };

        for p in &mut self.particles {
            p.position[axis] += self.direction * step * p.speed;

            let v = p.position[axis];
            if v < 0.0 || v >= limit {
                // Re-enter on the plane opposite the exit
                p.position[axis] = if v < 0.0 {
                    (limit - 1.0).max(0.0)
                } else {
                    0.0
                };
                for other in 0..3 {
                    if other != axis {
                        p.position[other] = random_coord(rng, extent[other]);
                    }
                }
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn axis(&self) -> FlowAxis {
        self.axis
    }

    pub fn base_count(&self) -> usize {
        self.base_count
    }
}

#[inline]
fn random_coord<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}
