//! Configuration error types
//!
//! Generation itself never fails: unknown keys fall back to defaults and
//! every normalizer guards against zero. Only configuration can be rejected.

use std::path::PathBuf;

/// Error reported when a grid, color mapper, or config file is set up
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One of the grid axes has zero extent
    #[error("grid dimension {axis} must be non-zero")]
    ZeroDimension {
        /// Axis name ("x", "y" or "z")
        axis: &'static str,
    },

    /// A gradient was configured without any color stops
    #[error("color gradient needs at least one color stop")]
    EmptyColorStops,

    /// A color stop lies outside the normalized [0, 1] range
    #[error("color stop position {0} is outside [0, 1]")]
    StopOutOfRange(f32),

    /// Vertical scale must be a positive finite number
    #[error("vertical scale {0} must be positive and finite")]
    InvalidVerticalScale(f32),

    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config document is not valid TOML for [`crate::config::Config`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered back to TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
