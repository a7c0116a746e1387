//! Moving Voronoi seeds for the cell-coloring effect

use glam::Vec3;
use rand::Rng;

use crate::grid::GridDims;

/// Seeds in a fresh field
pub const VORONOI_SEEDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiSeed {
    pub position: Vec3,
    pub velocity: Vec3,
    pub hue: f32,
}

/// Seeds that drift through the grid and bounce off its faces
#[derive(Debug, Clone)]
pub struct VoronoiField {
    extent: Vec3,
    seeds: Vec<VoronoiSeed>,
}

impl VoronoiField {
    pub fn new<R: Rng + ?Sized>(dims: &GridDims, count: usize, rng: &mut R) -> Self {
        let extent = dims.extent();
        let seeds = (0..count)
            .map(|_| {
                let position = random_unit(rng) * extent;
                let velocity = (random_unit(rng) - 0.5) * 2.0;
                VoronoiSeed {
                    position,
                    velocity,
                    hue: rng.random(),
                }
            })
            .collect();
        Self { extent, seeds }
    }

    pub fn seeds(&self) -> &[VoronoiSeed] {
        self.seeds.as_slice()
    }

    /// Advance every seed by `step` seconds of motion
    pub fn advance(&mut self, step: f32) {
        let extent = self.extent;
        for seed in &mut self.seeds {
            seed.position += seed.velocity * step;
            for axis in 0..3 {
                if seed.position[axis] < 0.0 || seed.position[axis] > extent[axis] {
                    seed.velocity[axis] = -seed.velocity[axis];
                    seed.position[axis] = seed.position[axis].clamp(0.0, extent[axis]);
                }
            }
        }
    }

    /// Hue of the seed closest to `p`; 0 with no seeds
    pub fn nearest_hue(&self, p: Vec3) -> f32 {
        self.seeds
            .iter()
            .map(|s| (s.position.distance_squared(p), s.hue))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or(0.0, |(_, hue)| hue)
    }
}

fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.random(), rng.random(), rng.random())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn dims() -> GridDims {
        GridDims::new(10, 20, 10).unwrap()
    }

    #[test]
    fn test_seeds_start_inside_grid() {
        let mut rng = Pcg32::seed_from_u64(4);
        let field = VoronoiField::new(&dims(), VORONOI_SEEDS, &mut rng);
        assert_eq!(field.seeds().len(), VORONOI_SEEDS);
        for s in field.seeds() {
            assert!(s.position.cmpge(Vec3::ZERO).all());
            assert!(s.position.cmple(dims().extent()).all());
            assert!(s.velocity.abs().cmple(Vec3::ONE).all());
            assert!((0.0..1.0).contains(&s.hue));
        }
    }

    #[test]
    fn test_seeds_reflect_at_faces() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut field = VoronoiField::new(&dims(), 3, &mut rng);
        for _ in 0..500 {
            field.advance(0.7);
            for s in field.seeds() {
                assert!(s.position.cmpge(Vec3::ZERO).all());
                assert!(s.position.cmple(dims().extent()).all());
            }
        }
    }

    #[test]
    fn test_nearest_hue_picks_closest_seed() {
        let mut rng = Pcg32::seed_from_u64(9);
        let field = VoronoiField::new(&dims(), VORONOI_SEEDS, &mut rng);
        let target = field.seeds()[2];
        assert_eq!(field.nearest_hue(target.position), target.hue);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = VoronoiField::new(&dims(), 5, &mut Pcg32::seed_from_u64(1));
        let b = VoronoiField::new(&dims(), 5, &mut Pcg32::seed_from_u64(1));
        assert_eq!(a.seeds(), b.seeds());
    }

    #[test]
    fn test_empty_field_hue_zero() {
        let field = VoronoiField::new(&dims(), 0, &mut Pcg32::seed_from_u64(1));
        assert_eq!(field.nearest_hue(Vec3::ONE), 0.0);
    }
}
