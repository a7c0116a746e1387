//! Tick-driven facade over scenes, post effects and the color stage

use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::info;

use crate::color::{ColorEffects, ColorMapper, ColorStage, EffectKind, Frame};
use crate::config::Config;
use crate::error::ConfigError;
use crate::grid::{GridDims, VoxelField};
use crate::params::ParameterSet;
use crate::post::{PostConfig, PostEffects};
use crate::scene::{ActiveScene, SceneEngine};

/// Stream offset separating the color stage's random source from the scenes'
const COLOR_STREAM: u64 = 1;

/// One generator, its post effects and the color stage, driven by `tick`
#[derive(Debug)]
pub struct Engine {
    dims: GridDims,
    scenes: SceneEngine,
    post: PostEffects,
    post_config: PostConfig,
    color: ColorStage,
    last_tick: Option<f32>,
}

impl Engine {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let dims = config.grid.dims()?;

        let mapper = config
            .gradient
            .as_ref()
            .map(|gradient| ColorMapper::new(dims, gradient))
            .transpose()?;

        let mut effects = ColorEffects::new(dims, Pcg32::new(config.seed, COLOR_STREAM));
        effects.set_intensity(config.effect.intensity);
        effects.set_speed(config.effect.speed);
        effects.set_color_mode(config.effect.color_mode);
        effects.set_effect_key(&config.effect.key);

        info!(
            size_x = dims.size_x,
            size_y = dims.size_y,
            size_z = dims.size_z,
            seed = config.seed,
            gradient = mapper.is_some(),
            "engine created"
        );

        Ok(Self {
            dims,
            scenes: SceneEngine::with_rng(dims, Pcg32::seed_from_u64(config.seed)),
            post: PostEffects::new(),
            post_config: config.post.clone(),
            color: ColorStage::new(config.effect.base_color, mapper, effects),
            last_tick: None,
        })
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Empty field sized for this engine
    pub fn new_field(&self) -> VoxelField {
        VoxelField::new(self.dims)
    }

    pub fn color(&self) -> &ColorStage {
        &self.color
    }

    pub fn color_mut(&mut self) -> &mut ColorStage {
        &mut self.color
    }

    /// Render scene `scene_key` at time `t` into `field` and advance the
    /// color effect `effect_key` to the same time
    pub fn tick(
        &mut self,
        t: f32,
        params: &ParameterSet,
        scene_key: &str,
        effect_key: &str,
        field: &mut VoxelField,
    ) -> ActiveScene {
        let previous = self.scenes.active();
        let active = self.scenes.render(t, params, scene_key, field);
        if previous.is_some_and(|p| p.kind != active.kind) {
            self.post.reset();
        }

        let settings = self.post_config.with_overrides(params);
        self.post.apply(t, &settings, field);

        let effects = self.color.effects_mut();
        effects.set_effect(EffectKind::from_key_or(effect_key, EffectKind::None));
        let dt = self.last_tick.map_or(0.0, |last| t - last);
        effects.update(dt);
        self.last_tick = Some(t);

        active
    }

    /// Color the field produced by the last tick
    pub fn colorize(&mut self, field: &VoxelField) -> Frame {
        self.color.colorize(field)
    }
}
