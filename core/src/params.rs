//! Parameter snapshot consumed by generators each tick
//!
//! Parameters live in two scopes: *global* values shared by every scene
//! and *scene* values whose meaning depends on the active scene. A
//! [`ParamView`] resolves a name for one scene in this order:
//!
//! 1. the scene scope
//! 2. a remapped global value from [`crate::remap::REMAP_TABLE`]
//! 3. the global scope under the same name
//! 4. the scene descriptor's defaults, when the view carries them
//! 5. the caller-supplied default

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::remap;

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Choice(String),
}

impl ParamValue {
    /// Numeric view; choices have none
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f32),
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Self::Choice(_) => None,
        }
    }

    /// Integer view (floats are rounded)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.is_finite() => Some(v.round() as i64),
            Self::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Boolean view; numbers are true when non-zero
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Int(v) => Some(*v != 0),
            Self::Float(v) => Some(*v != 0.0),
            Self::Choice(s) => match s.as_str() {
                "true" | "on" => Some(true),
                "false" | "off" => Some(false),
                _ => None,
            },
        }
    }

    /// String view; only choices have one
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v as f32)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Choice(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Choice(v)
    }
}

/// Read-only parameter snapshot for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Values shared across scene types
    pub global: HashMap<String, ParamValue>,
    /// Values whose meaning depends on the active scene
    pub scene: HashMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style global assignment
    pub fn with_global(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set_global(name, value);
        self
    }

    /// Builder-style scene assignment
    pub fn with_scene(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set_scene(name, value);
        self
    }

    pub fn set_global(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.global.insert(name.to_string(), value.into());
    }

    pub fn set_scene(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.scene.insert(name.to_string(), value.into());
    }

    /// Overlay `other` on top of `self`; values in `other` win
    pub fn merged(&self, other: &ParameterSet) -> ParameterSet {
        let mut out = self.clone();
        out.global
            .extend(other.global.iter().map(|(k, v)| (k.clone(), v.clone())));
        out.scene
            .extend(other.scene.iter().map(|(k, v)| (k.clone(), v.clone())));
        out
    }

    /// Resolve parameters as seen by `scene_id`
    pub fn view<'a>(&'a self, scene_id: &'a str) -> ParamView<'a> {
        self.view_with_defaults(scene_id, &[])
    }

    /// Resolve parameters as seen by `scene_id`, falling back to `defaults`
    pub fn view_with_defaults<'a>(
        &'a self,
        scene_id: &'a str,
        defaults: &'a [(&'static str, f32)],
    ) -> ParamView<'a> {
        ParamView {
            params: self,
            scene_id,
            defaults,
        }
    }
}

/// Scene-scoped lookup over a [`ParameterSet`]
#[derive(Debug, Clone, Copy)]
pub struct ParamView<'a> {
    params: &'a ParameterSet,
    scene_id: &'a str,
    defaults: &'a [(&'static str, f32)],
}

impl<'a> ParamView<'a> {
    /// Scene identifier this view resolves for
    pub fn scene_id(&self) -> &'a str {
        self.scene_id
    }

    /// Float parameter; non-finite values fall back to `default`
    pub fn float(&self, name: &str, default: f32) -> f32 {
        if let Some(v) = self.params.scene.get(name).and_then(ParamValue::as_f32) {
            if v.is_finite() {
                return v;
            }
        }
        if let Some(v) = remap::resolve(self.scene_id, name, &self.params.global) {
            return v;
        }
        match self.params.global.get(name).and_then(ParamValue::as_f32) {
            Some(v) if v.is_finite() => v,
            _ => self.descriptor_default(name).unwrap_or(default),
        }
    }

    /// Integer parameter
    pub fn int(&self, name: &str, default: i64) -> i64 {
        if let Some(v) = self.params.scene.get(name).and_then(ParamValue::as_i64) {
            return v;
        }
        if let Some(v) = remap::resolve(self.scene_id, name, &self.params.global) {
            return v.round() as i64;
        }
        self.params
            .global
            .get(name)
            .and_then(ParamValue::as_i64)
            .or_else(|| self.descriptor_default(name).map(|v| v.round() as i64))
            .unwrap_or(default)
    }

    fn descriptor_default(&self, name: &str) -> Option<f32> {
        self.defaults
            .iter()
            .find(|(key, _)| *key == name)
            .map(|&(_, v)| v)
    }

    /// Count parameter clamped to `[min, max]`
    pub fn count(&self, name: &str, default: usize, min: usize, max: usize) -> usize {
        let v = self.int(name, default as i64);
        v.clamp(min as i64, max as i64) as usize
    }

    /// Boolean parameter
    pub fn flag(&self, name: &str, default: bool) -> bool {
        self.params
            .scene
            .get(name)
            .or_else(|| self.params.global.get(name))
            .and_then(ParamValue::as_bool)
            .unwrap_or(default)
    }

    /// Enumerated parameter as its string key
    pub fn choice(&self, name: &str, default: &'a str) -> &'a str {
        self.params
            .scene
            .get(name)
            .or_else(|| self.params.global.get(name))
            .and_then(ParamValue::as_choice)
            .unwrap_or(default)
    }
}
