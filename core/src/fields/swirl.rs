//! Swirl path math shared by particle flow and the vortex scene
//!
//! Every function maps a normalized progress value and a phase onto a grid
//! position. Nothing here holds state.

use std::f32::consts::TAU;

use glam::Vec3;

/// Shape of one swirl instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swirl {
    /// Base of the swirl axis (x/z used; y is the floor for tornado)
    pub center: Vec3,
    /// Maximum radius in voxels
    pub radius: f32,
    /// Height of the grid in voxels
    pub height: f32,
    /// Angular speed multiplier
    pub speed: f32,
    /// +1.0 counter-clockwise, -1.0 clockwise
    pub direction: f32,
}

impl Swirl {
    /// Funnel narrowing with height, down to 30% of the base radius
    pub fn tornado(&self, progress: f32, phase: f32, t: f32) -> Vec3 {
        let r = self.radius * (1.0 - 0.7 * progress);
        let angle = phase + self.direction * (t * self.speed * 3.0 + progress * 2.0 * TAU);
        Vec3::new(
            self.center.x + r * angle.cos(),
            progress * self.height,
            self.center.z + r * angle.sin(),
        )
    }

    /// Spiral tightening as it drains downward
    pub fn whirlpool(&self, progress: f32, phase: f32, t: f32) -> Vec3 {
        let r = self.radius * (1.0 - progress);
        let angle = phase + self.direction * (t * self.speed * 2.0 + progress * 3.0 * TAU);
        Vec3::new(
            self.center.x + r * angle.cos(),
            self.height * 0.5 * (1.0 - progress),
            self.center.z + r * angle.sin(),
        )
    }

    /// Logarithmic spiral arm in the horizontal plane
    ///
    /// `arm` selects one of `arms` evenly spaced arms; `spread` in [0, 1)
    /// jitters the point off the arm center line.
    pub fn galaxy(&self, progress: f32, arm: usize, arms: usize, spread: f32, t: f32) -> Vec3 {
        let arms = arms.max(1);
        let r = self.radius * progress;
        let tightness = 2.5;
        let angle = arm as f32 * TAU / arms as f32 + tightness * (r + 1.0).ln()
            - self.direction * t * self.speed * 0.3
            + (spread - 0.5) * 0.6;
        Vec3::new(
            self.center.x + r * angle.cos(),
            self.center.y + (spread - 0.5) * 2.0 * (1.0 - progress),
            self.center.z + r * angle.sin(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swirl() -> Swirl {
        Swirl {
            center: Vec3::new(10.0, 5.0, 10.0),
            radius: 8.0,
            height: 20.0,
            speed: 1.0,
            direction: 1.0,
        }
    }

    #[test]
    fn test_tornado_narrows_with_height() {
        let s = swirl();
        let r = |p: Vec3| (p - Vec3::new(10.0, p.y, 10.0)).length();
        let low = s.tornado(0.0, 0.0, 0.0);
        let mid = s.tornado(0.5, 0.0, 0.0);
        let high = s.tornado(0.95, 0.0, 0.0);
        assert!(r(mid) < r(low));
        assert!(r(high) < r(mid));
        assert!((r(low) - 8.0).abs() < 1e-4);
        assert!((s.tornado(1.0, 0.0, 0.0).y - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_whirlpool_closes_at_end() {
        let p = swirl().whirlpool(1.0, 0.3, 2.0);
        assert!((p.x - 10.0).abs() < 1e-5 && (p.z - 10.0).abs() < 1e-5);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_direction_mirrors_rotation() {
        let cw = Swirl {
            direction: -1.0,
            ..swirl()
        };
        let a = swirl().tornado(0.5, 0.0, 1.0);
        let b = cw.tornado(0.5, 0.0, 1.0);
        assert!((a.x - b.x).abs() < 1e-4);
        assert!((a.z - 10.0 + (b.z - 10.0)).abs() < 1e-4);
    }
}
