//! Transient per-voxel sparkle timers

use hashbrown::HashMap;
use rand::Rng;

/// Probability per voxel per frame that an idle voxel starts sparkling
pub const SPARKLE_FREQUENCY: f32 = 0.01;
/// Seconds a sparkle lasts
pub const SPARKLE_DURATION: f32 = 0.3;
/// Fraction of the lifetime spent fading in
const FADE_IN: f32 = 0.3;

/// Integer voxel coordinate
pub type VoxelKey = (u32, u32, u32);

/// Map from voxel coordinate to activation time
#[derive(Debug, Clone)]
pub struct SparkleRegistry {
    started: HashMap<VoxelKey, f32>,
    frequency: f32,
    duration: f32,
}

impl Default for SparkleRegistry {
    fn default() -> Self {
        Self::new(SPARKLE_FREQUENCY, SPARKLE_DURATION)
    }
}

impl SparkleRegistry {
    pub fn new(frequency: f32, duration: f32) -> Self {
        Self {
            started: HashMap::new(),
            frequency: frequency.clamp(0.0, 1.0),
            duration: duration.max(f32::EPSILON),
        }
    }

    /// Brightness in [0, 1] of a sparkling voxel, `None` when idle
    pub fn brightness(&self, key: VoxelKey, now: f32) -> Option<f32> {
        let start = *self.started.get(&key)?;
        let t = (now - start) / self.duration;
        let b = if t < FADE_IN {
            t / FADE_IN
        } else {
            (1.0 - t) / (1.0 - FADE_IN)
        };
        Some(b.clamp(0.0, 1.0))
    }

    /// Randomly start a sparkle on an idle voxel
    pub fn maybe_activate<R: Rng + ?Sized>(&mut self, key: VoxelKey, now: f32, rng: &mut R) {
        if self.started.contains_key(&key) {
            return;
        }
        if rng.random::<f32>() < self.frequency {
            self.started.insert(key, now);
        }
    }

    /// Drop sparkles older than the duration
    pub fn expire(&mut self, now: f32) {
        let duration = self.duration;
        self.started.retain(|_, start| now - *start <= duration);
    }

    pub fn clear(&mut self) {
        self.started.clear();
    }

    pub fn len(&self) -> usize {
        self.started.len()
    }

    pub fn is_empty(&self) -> bool {
        self.started.is_empty()
    }
}
