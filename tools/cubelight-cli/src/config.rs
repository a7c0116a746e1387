//! Config command - print the default configuration

use anyhow::{Context, Result};
use cubelight_core::Config;

/// Execute the config command
pub fn execute() -> Result<()> {
    let toml = Config::default()
        .to_toml_string()
        .context("Failed to serialize default config")?;
    print!("{toml}");
    Ok(())
}
