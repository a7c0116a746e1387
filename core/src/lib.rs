//! Cubelight Core - procedural scenes and color effects for LED cubes
//!
//! This crate fills a dense voxel brightness field once per tick from a
//! parameterized generator, then optionally colors it into an RGB frame.
//!
//! # Architecture
//!
//! - [`SceneEngine`] - Scene registry and generator dispatch
//! - [`transform`] - Shared stackable transform pipeline for shapes
//! - [`fields`] - Particle, wave, noise, vortex, lattice and illusion generators
//! - [`color`] - Effect library, spatial gradients and frame output
//! - [`post`] - Global decay/strobe/pulse/invert on the scalar field
//! - [`mask`] - Scrolling band masks and gap regions, run inside [`post`]
//! - [`Engine`] - Config-driven facade tying the stages together

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod grid;
mod keys;
pub mod mask;
pub mod noise;
pub mod params;
pub mod particles;
pub mod post;
pub mod remap;
pub mod scene;
pub mod shapes;
pub mod transform;

pub use color::{ColorMode, EffectKind, Frame, Rgb};
pub use config::Config;
pub use engine::Engine;
pub use error::ConfigError;
pub use grid::{GridDims, VoxelField};
pub use params::{ParamValue, ParamView, ParameterSet};
pub use scene::{ActiveScene, SCENES, SceneEngine, SceneKind};
