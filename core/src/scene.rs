//! Scene registry and generator dispatch
//!
//! A scene is selected by key, then a sub-pattern by the scene-scope
//! `pattern` parameter. Unknown keys fall back to the first registry entry
//! (or the scene's default pattern) instead of failing.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::{debug, info, warn};

use crate::fields::illusions::{self, IllusionParams, IllusionPattern};
use crate::fields::lattice::{self, LatticeParams, LatticePattern};
use crate::fields::particle_flow::{FlowParams, FlowPattern, ParticleFlow};
use crate::fields::procedural::{self, CellField, ProceduralParams, ProceduralPattern};
use crate::fields::vortex::{self, VortexParams, VortexPattern};
use crate::fields::waves::{self, WaveParams, WavePattern};
use crate::grid::{GridDims, VoxelField};
use crate::keys::keyed_enum;
use crate::noise::Perlin3;
use crate::params::{ParamView, ParameterSet};
use crate::shapes::{self, ShapeKind, ShapeParams};
use crate::transform::{TransformParams, object_poses};

keyed_enum! {
    /// Generator family
    pub enum SceneKind {
        ShapeMorph => "shapeMorph",
        ParticleFlow => "particleFlow",
        WaveField => "waveField",
        Procedural => "procedural",
        Vortex => "vortex",
        Lattice => "grid",
        Illusions => "illusions",
    }
}

/// Immutable registry entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneDescriptor {
    pub id: &'static str,
    pub category: &'static str,
    pub kind: SceneKind,
    /// Pattern used when the `pattern` parameter is absent or unknown
    pub default_pattern: &'static str,
    /// Numeric defaults consulted after every parameter scope
    pub defaults: &'static [(&'static str, f32)],
}

/// Registry, in dispatch-fallback order
pub static SCENES: &[SceneDescriptor] = &[
    SceneDescriptor {
        id: "shapeMorph",
        category: "geometric",
        kind: SceneKind::ShapeMorph,
        default_pattern: "sphere",
        defaults: &[("thickness", 1.0), ("layers", 3.0), ("turns", 0.3)],
    },
    SceneDescriptor {
        id: "particleFlow",
        category: "particles",
        kind: SceneKind::ParticleFlow,
        default_pattern: "fall",
        defaults: &[("density", 0.5), ("speed", 1.0), ("particleSize", 0.5)],
    },
    SceneDescriptor {
        id: "waveField",
        category: "waves",
        kind: SceneKind::WaveField,
        default_pattern: "ripple",
        defaults: &[("amplitude", 0.5), ("frequency", 1.0), ("thickness", 1.0)],
    },
    SceneDescriptor {
        id: "procedural",
        category: "procedural",
        kind: SceneKind::Procedural,
        default_pattern: "noise",
        defaults: &[("scale", 0.1), ("threshold", 0.2), ("octaves", 4.0)],
    },
    SceneDescriptor {
        id: "vortex",
        category: "particles",
        kind: SceneKind::Vortex,
        default_pattern: "tornado",
        defaults: &[("radius", 6.0), ("points", 120.0), ("arms", 3.0)],
    },
    SceneDescriptor {
        id: "grid",
        category: "grid",
        kind: SceneKind::Lattice,
        default_pattern: "full",
        defaults: &[("size", 0.5), ("density", 0.5)],
    },
    SceneDescriptor {
        id: "illusions",
        category: "illusions",
        kind: SceneKind::Illusions,
        default_pattern: "infiniteCorridor",
        defaults: &[("size", 1.0), ("density", 0.0)],
    },
];

impl SceneKind {
    /// Registry entry for this scene
    pub fn descriptor(self) -> &'static SceneDescriptor {
        SCENES
            .iter()
            .find(|d| d.kind == self)
            .unwrap_or(&SCENES[0])
    }

    /// Every pattern key this scene accepts
    pub fn patterns(self) -> Vec<&'static str> {
        fn keys<T: Copy>(all: &[T], key: fn(T) -> &'static str) -> Vec<&'static str> {
            all.iter().map(|&v| key(v)).collect()
        }
        match self {
            Self::ShapeMorph => keys(ShapeKind::ALL, ShapeKind::key),
            Self::ParticleFlow => keys(FlowPattern::ALL, FlowPattern::key),
            Self::WaveField => keys(WavePattern::ALL, WavePattern::key),
            Self::Procedural => keys(ProceduralPattern::ALL, ProceduralPattern::key),
            Self::Vortex => keys(VortexPattern::ALL, VortexPattern::key),
            Self::Lattice => keys(LatticePattern::ALL, LatticePattern::key),
            Self::Illusions => keys(IllusionPattern::ALL, IllusionPattern::key),
        }
    }
}

/// Scene and pattern that rendered the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveScene {
    pub kind: SceneKind,
    pub pattern: &'static str,
}

/// Owns the stateful pieces of every generator and dispatches ticks
pub struct SceneEngine {
    dims: GridDims,
    rng: Pcg32,
    noise: Perlin3,
    flow: ParticleFlow,
    cells: Option<CellField>,
    active: Option<ActiveScene>,
}

impl std::fmt::Debug for SceneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEngine")
            .field("dims", &self.dims)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl SceneEngine {
    /// Create an engine whose random state derives from `seed`
    pub fn new(dims: GridDims, seed: u64) -> Self {
        Self::with_rng(dims, Pcg32::seed_from_u64(seed))
    }

    /// Create an engine drawing from an injected random source
    pub fn with_rng(dims: GridDims, mut rng: Pcg32) -> Self {
        let noise = Perlin3::new(&mut rng);
        Self {
            dims,
            rng,
            noise,
            flow: ParticleFlow::new(dims),
            cells: None,
            active: None,
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Scene rendered by the most recent tick
    pub fn active(&self) -> Option<ActiveScene> {
        self.active
    }

    /// Overwrite `field` with scene `scene_key` at time `t`
    pub fn render(
        &mut self,
        t: f32,
        params: &ParameterSet,
        scene_key: &str,
        field: &mut VoxelField,
    ) -> ActiveScene {
        if field.dims() != self.dims {
            warn!(
                expected = ?self.dims,
                got = ?field.dims(),
                "field dimensions changed, resetting generator state"
            );
            self.dims = field.dims();
            self.flow = ParticleFlow::new(self.dims);
            self.cells = None;
        }

        let kind = SceneKind::from_key_or(scene_key, SCENES[0].kind);
        let descriptor = kind.descriptor();
        let view = params.view_with_defaults(descriptor.id, descriptor.defaults);
        let pattern_key = view.choice("pattern", descriptor.default_pattern);

        field.clear();
        let pattern = match kind {
            SceneKind::ShapeMorph => self.render_shape(t, &view, pattern_key, field),
            SceneKind::ParticleFlow => {
                let pattern = FlowPattern::from_key_or(pattern_key, FlowPattern::Fall);
                let flow_params = FlowParams::from_view(&view, &self.dims);
                self.flow
                    .render(pattern, t, &flow_params, field, &mut self.rng);
                pattern.key()
            }
            SceneKind::WaveField => {
                let pattern = WavePattern::from_key_or(pattern_key, WavePattern::Ripple);
                waves::render(pattern, t, &WaveParams::from_view(&view), field);
                pattern.key()
            }
            SceneKind::Procedural => self.render_procedural(t, &view, pattern_key, field),
            SceneKind::Vortex => {
                let pattern = VortexPattern::from_key_or(pattern_key, VortexPattern::Tornado);
                vortex::render(pattern, t, &VortexParams::from_view(&view), field);
                pattern.key()
            }
            SceneKind::Lattice => {
                let pattern = LatticePattern::from_key_or(pattern_key, LatticePattern::Full);
                lattice::render(pattern, t, &LatticeParams::from_view(&view), field);
                pattern.key()
            }
            SceneKind::Illusions => {
                let pattern =
                    IllusionPattern::from_key_or(pattern_key, IllusionPattern::InfiniteCorridor);
                illusions::render(pattern, t, &IllusionParams::from_view(&view), field);
                pattern.key()
            }
        };

        let active = ActiveScene { kind, pattern };
        if self.active != Some(active) {
            info!(scene = kind.key(), pattern, "scene changed");
            self.active = Some(active);
        }
        active
    }

    fn render_shape(
        &mut self,
        t: f32,
        view: &ParamView<'_>,
        pattern_key: &str,
        field: &mut VoxelField,
    ) -> &'static str {
        let kind = ShapeKind::from_key_or(pattern_key, ShapeKind::Sphere);
        let transform = TransformParams::from_view(view);
        let poses = object_poses(t, &transform, &self.dims);
        let shape = ShapeParams::from_view(view, &self.dims);
        shapes::rasterize(kind, field, &poses, &shape);
        kind.key()
    }

    fn render_procedural(
        &mut self,
        t: f32,
        view: &ParamView<'_>,
        pattern_key: &str,
        field: &mut VoxelField,
    ) -> &'static str {
        let pattern = ProceduralPattern::from_key_or(pattern_key, ProceduralPattern::Noise);
        let params = ProceduralParams::from_view(view);
        match pattern {
            ProceduralPattern::Noise => procedural::render_noise(&self.noise, false, t, &params, field),
            ProceduralPattern::Fbm => procedural::render_noise(&self.noise, true, t, &params, field),
            ProceduralPattern::Cellular => {
                let stale = self.cells.as_ref().is_none_or(|c| c.len() != params.cells);
                if stale {
                    debug!(cells = params.cells, "seeding cellular pattern");
                    self.cells = Some(CellField::new(&self.dims, params.cells, &mut self.rng));
                }
                if let Some(cells) = &self.cells {
                    procedural::render_cellular(cells, t, &params, field);
                }
            }
        }
        pattern.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> GridDims {
        GridDims::new(10, 12, 10).unwrap()
    }

    #[test]
    fn test_registry_covers_every_kind() {
        for &kind in SceneKind::ALL {
            let d = kind.descriptor();
            assert_eq!(d.kind, kind);
            assert_eq!(d.id, kind.key());
            assert!(kind.patterns().contains(&d.default_pattern));
        }
    }

    #[test]
    fn test_unknown_scene_falls_back() {
        let mut engine = SceneEngine::new(dims(), 1);
        let mut field = VoxelField::new(dims());
        let active = engine.render(0.0, &ParameterSet::new(), "nope", &mut field);
        assert_eq!(active.kind, SceneKind::ShapeMorph);
        assert_eq!(active.pattern, "sphere");
    }

    #[test]
    fn test_unknown_pattern_falls_back() {
        let mut engine = SceneEngine::new(dims(), 1);
        let mut field = VoxelField::new(dims());
        let params = ParameterSet::new().with_scene("pattern", "zigzag");
        let active = engine.render(0.0, &params, "waveField", &mut field);
        assert_eq!(active.pattern, "ripple");
    }

    #[test]
    fn test_every_scene_and_pattern_renders_in_bounds() {
        let mut engine = SceneEngine::new(dims(), 3);
        let mut field = VoxelField::new(dims());
        for &kind in SceneKind::ALL {
            for pattern in kind.patterns() {
                let params = ParameterSet::new().with_scene("pattern", pattern);
                let active = engine.render(1.3, &params, kind.key(), &mut field);
                assert_eq!(active.pattern, pattern);
                assert_eq!(field.values().len(), dims().volume());
                assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
            }
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let run = |seed| {
            let mut engine = SceneEngine::new(dims(), seed);
            let mut field = VoxelField::new(dims());
            let params = ParameterSet::new().with_scene("pattern", "rain");
            for i in 0..5 {
                engine.render(i as f32 * 0.1, &params, "particleFlow", &mut field);
            }
            field
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_render_overwrites_previous_frame() {
        let mut engine = SceneEngine::new(dims(), 1);
        let mut field = VoxelField::new(dims());
        field.values_mut().fill(1.0);
        let params = ParameterSet::new()
            .with_scene("pattern", "noise")
            .with_scene("threshold", 1.5);
        engine.render(0.0, &params, "procedural", &mut field);
        assert_eq!(field.active_count(), 0);
    }
}
