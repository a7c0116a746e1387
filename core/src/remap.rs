//! Global to scene parameter remapping
//!
//! Tuning data, not algorithm: each row scales one global parameter into a
//! scene-scope name and clamps the result. Scene-scope values always take
//! precedence over a remapped global.

use hashbrown::HashMap;

use crate::params::ParamValue;

/// One remap row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemapRule {
    /// Scene identifier the row applies to
    pub scene: &'static str,
    /// Global parameter read
    pub global: &'static str,
    /// Scene parameter produced
    pub scene_param: &'static str,
    pub scale: f32,
    pub min: f32,
    pub max: f32,
}

impl RemapRule {
    /// Scale and clamp a global value
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        (value * self.scale).clamp(self.min, self.max)
    }
}

const fn rule(
    scene: &'static str,
    global: &'static str,
    scene_param: &'static str,
    scale: f32,
    min: f32,
    max: f32,
) -> RemapRule {
    RemapRule {
        scene,
        global,
        scene_param,
        scale,
        min,
        max,
    }
}

/// Declarative remap table
pub static REMAP_TABLE: &[RemapRule] = &[
    rule("shapeMorph", "size", "radius", 6.0, 1.0, 20.0),
    rule("shapeMorph", "amplitude", "thickness", 3.0, 0.5, 4.0),
    rule("particleFlow", "size", "particleSize", 1.67, 1.0, 5.0),
    rule("particleFlow", "density", "density", 1.0, 0.0, 4.0),
    rule("waveField", "amplitude", "amplitude", 1.0, 0.0, 1.0),
    rule("waveField", "frequency", "frequency", 1.0, 0.1, 5.0),
    rule("procedural", "size", "scale", 0.1, 0.01, 1.0),
    rule("procedural", "amplitude", "threshold", 0.5, -1.0, 1.0),
    rule("vortex", "size", "radius", 8.0, 2.0, 20.0),
    rule("vortex", "objectCount", "instances", 1.0, 1.0, 4.0),
    rule("grid", "size", "size", 1.0, 0.1, 1.5),
];

/// Find the rule producing `scene_param` for `scene`
pub fn rule_for(scene: &str, scene_param: &str) -> Option<&'static RemapRule> {
    REMAP_TABLE
        .iter()
        .find(|r| r.scene == scene && r.scene_param == scene_param)
}

/// Remapped value of `scene_param`, when a rule exists and its global is set
pub fn resolve(scene: &str, scene_param: &str, global: &HashMap<String, ParamValue>) -> Option<f32> {
    let rule = rule_for(scene, scene_param)?;
    let value = global.get(rule.global)?.as_f32()?;
    value.is_finite().then(|| rule.apply(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;

    #[test]
    fn test_rule_clamps() {
        let r = rule_for("particleFlow", "particleSize").unwrap();
        assert!((r.apply(1.0) - 1.67).abs() < 1e-6);
        assert_eq!(r.apply(10.0), 5.0);
        assert_eq!(r.apply(0.0), 1.0);
    }

    #[test]
    fn test_remap_through_view() {
        let params = ParameterSet::new().with_global("size", 2.0);
        assert_eq!(params.view("vortex").float("radius", 4.0), 16.0);
        // other scenes ignore the row
        assert_eq!(params.view("waveField").float("radius", 4.0), 4.0);
    }

    #[test]
    fn test_scene_value_beats_remap() {
        let params = ParameterSet::new()
            .with_global("size", 2.0)
            .with_scene("radius", 3.0);
        assert_eq!(params.view("vortex").float("radius", 4.0), 3.0);
    }

    #[test]
    fn test_table_rows_unique() {
        for (i, a) in REMAP_TABLE.iter().enumerate() {
            for b in &REMAP_TABLE[i + 1..] {
                assert!(!(a.scene == b.scene && a.scene_param == b.scene_param));
            }
        }
    }
}
