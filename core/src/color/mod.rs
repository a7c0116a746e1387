//! Color stage: effect library, spatial gradients and frame output

pub mod convert;
pub mod effects;
pub mod mapper;
pub mod stage;

pub use convert::{Rgb, hsl_to_rgb, lerp_rgb, rgb_to_hsl};
pub use effects::{Candidate, ColorEffects, ColorMode, EffectKind};
pub use mapper::{
    Axis, ColorMapper, ColorStop, Falloff, GradientConfig, GradientKind, interpolate_stops,
};
pub use stage::{ColorStage, Frame};
