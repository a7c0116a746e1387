//! Engine configuration (TOML)
//!
//! Every section is optional; an empty document yields a 20×40×20 grid
//! rendering the default shape with no color effect.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::ColorMode;
use crate::color::Rgb;
use crate::color::effects::SPEED_RANGE;
use crate::color::mapper::{GradientConfig, sorted_stops};
use crate::error::ConfigError;
use crate::grid::{DEFAULT_VERTICAL_SCALE, GridDims};
use crate::params::ParameterSet;
use crate::post::PostConfig;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seed for every random source (default: 0)
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub effect: EffectConfig,
    /// Spatial gradient overriding the base color (default: none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<GradientConfig>,
    #[serde(default)]
    pub post: PostConfig,
    /// Initial parameter snapshot handed to every tick
    #[serde(default)]
    pub params: ParameterSet,
}

/// Grid dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Width (default: 20)
    #[serde(default = "default_size_xz")]
    pub size_x: usize,
    /// Height (default: 40)
    #[serde(default = "default_size_y")]
    pub size_y: usize,
    /// Length (default: 20)
    #[serde(default = "default_size_xz")]
    pub size_z: usize,
    /// Vertical distance multiplier (default: 2.0)
    #[serde(default = "default_vertical_scale")]
    pub vertical_scale: f32,
}

/// Active scene selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Scene key (default: "shapeMorph")
    #[serde(default = "default_scene_key")]
    pub key: String,
    /// Sub-pattern key; the scene's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Color effect settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Effect key (default: "none")
    #[serde(default = "default_effect_key")]
    pub key: String,
    /// Blend toward the effect color (default: 1.0, range: 0.0-1.0)
    #[serde(default = "default_one")]
    pub intensity: f32,
    /// Effect time multiplier (default: 1.0, range: 0.1-5.0)
    #[serde(default = "default_one")]
    pub speed: f32,
    #[serde(default)]
    pub color_mode: ColorMode,
    /// Color used where no gradient applies (default: cyan)
    #[serde(default = "default_base_color")]
    pub base_color: Rgb,
}

fn default_size_xz() -> usize {
    20
}
fn default_size_y() -> usize {
    40
}
fn default_vertical_scale() -> f32 {
    DEFAULT_VERTICAL_SCALE
}
fn default_scene_key() -> String {
    "shapeMorph".to_string()
}
fn default_effect_key() -> String {
    "none".to_string()
}
fn default_one() -> f32 {
    1.0
}
fn default_base_color() -> Rgb {
    [0, 200, 255]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            grid: GridConfig::default(),
            scene: SceneConfig::default(),
            effect: EffectConfig::default(),
            gradient: None,
            post: PostConfig::default(),
            params: ParameterSet::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size_x: default_size_xz(),
            size_y: default_size_y(),
            size_z: default_size_xz(),
            vertical_scale: default_vertical_scale(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            key: default_scene_key(),
            pattern: None,
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            key: default_effect_key(),
            intensity: default_one(),
            speed: default_one(),
            color_mode: ColorMode::default(),
            base_color: default_base_color(),
        }
    }
}

impl GridConfig {
    /// Validated grid dimensions
    pub fn dims(&self) -> Result<GridDims, ConfigError> {
        GridDims::with_vertical_scale(self.size_x, self.size_y, self.size_z, self.vertical_scale)
    }
}

impl Config {
    /// Parse a TOML document; missing fields take their defaults
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations that cannot drive an engine
    ///
    /// Out-of-range effect intensity and speed are not errors; they are
    /// clamped when applied and reported here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.dims()?;
        if let Some(gradient) = &self.gradient {
            sorted_stops(&gradient.stops)?;
        }
        if !(0.0..=1.0).contains(&self.effect.intensity) {
            warn!(intensity = self.effect.intensity, "effect intensity will be clamped to [0, 1]");
        }
        if !(SPEED_RANGE.0..=SPEED_RANGE.1).contains(&self.effect.speed) {
            warn!(speed = self.effect.speed, "effect speed will be clamped to [0.1, 5]");
        }
        if !(0.0..=100.0).contains(&self.post.mask.thickness) {
            warn!(
                thickness = self.post.mask.thickness,
                "mask thickness will be clamped to [0, 100] percent"
            );
        }
        for gap in self.post.mask.gaps.iter().filter(|g| g.min >= g.max) {
            warn!(min = gap.min, max = gap.max, "gap region is empty");
        }
        Ok(())
    }

    /// Parameter snapshot with the configured pattern applied
    pub fn parameter_set(&self) -> ParameterSet {
        let mut params = self.params.clone();
        if let Some(pattern) = &self.scene.pattern {
            params.set_scene("pattern", pattern.as_str());
        }
        params
    }
}

/// Read, parse and validate a config file
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::from_toml_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Axis;
    use crate::color::mapper::{ColorStop, GradientKind};
    use crate::mask::{GapRegion, MaskDirection};
    use crate::post::Rate;
    use std::io::Write;

    // =============================================================
    // Default value tests
    // =============================================================

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.grid.size_x, 20);
        assert_eq!(config.grid.size_y, 40);
        assert_eq!(config.grid.size_z, 20);
        assert!((config.grid.vertical_scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.scene.key, "shapeMorph");
        assert_eq!(config.effect.key, "none");
        assert!(config.gradient.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_partial_effect() {
        let config = Config::from_toml_str(
            r#"
[effect]
key = "plasma"
color_mode = "base"
"#,
        )
        .unwrap();
        assert_eq!(config.effect.key, "plasma");
        assert_eq!(config.effect.color_mode, ColorMode::Base);
        assert!((config.effect.intensity - 1.0).abs() < f32::EPSILON); // default
        assert_eq!(config.effect.base_color, default_base_color()); // default
    }

    #[test]
    fn test_config_deserialize_full() {
        let config = Config::from_toml_str(
            r#"
seed = 42

[grid]
size_x = 8
size_y = 16
size_z = 8

[scene]
key = "waveField"
pattern = "standing"

[gradient]
kind = "radial"
falloff = "smoothstep"
stops = [
    { position = 0.0, color = [255, 0, 0] },
    { position = 1.0, color = [0, 0, 255] },
]

[post]
strobe = "medium"
decay = 1.5

[post.mask]
enabled = true
thickness = 30.0
direction = "rings"

[[post.mask.gaps]]
axis = "y"
min = 18
max = 22

[params.global]
speed = 2.0

[params.scene]
amplitude = 0.8
"#,
        )
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.grid.size_y, 16);
        assert_eq!(config.scene.pattern.as_deref(), Some("standing"));
        let gradient = config.gradient.as_ref().unwrap();
        assert_eq!(gradient.kind, GradientKind::Radial);
        assert_eq!(gradient.stops.len(), 2);
        assert_eq!(config.post.strobe, Rate::Medium);
        assert_eq!(config.post.mask.direction, MaskDirection::Rings);
        assert_eq!(config.post.mask.gaps.len(), 1);
        assert_eq!(config.post.mask.gaps[0].max, 22);
        let params = config.parameter_set();
        let view = params.view("waveField");
        assert_eq!(view.choice("pattern", "ripple"), "standing");
        assert_eq!(view.float("speed", 1.0), 2.0);
        assert!(config.validate().is_ok());
    }

    // =============================================================
    // Validation tests
    // =============================================================

    #[test]
    fn test_zero_dimension_rejected() {
        let config = Config::from_toml_str("[grid]\nsize_y = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDimension { axis: "y" })
        ));
    }

    #[test]
    fn test_empty_stops_rejected() {
        let config = Config {
            gradient: Some(GradientConfig {
                stops: Vec::new(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyColorStops)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            Config::from_toml_str("[grid\nsize_x = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    // =============================================================
    // File round-trip tests
    // =============================================================

    #[test]
    fn test_config_roundtrip_through_file() {
        let mut config = Config::default();
        config.seed = 7;
        config.scene.pattern = Some("torus".to_string());
        config.gradient = Some(GradientConfig {
            stops: vec![ColorStop::new(0.0, [1, 2, 3]), ColorStop::new(0.5, [4, 5, 6])],
            ..Default::default()
        });
        config.params.set_global("size", 0.75);
        config.post.mask.enabled = true;
        config.post.mask.direction = MaskDirection::DiagonalXy;
        config.post.mask.gaps.push(GapRegion {
            axis: Axis::Z,
            min: 3,
            max: 5,
        });

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
