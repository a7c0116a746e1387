//! Cubelight CLI - Headless scene renderer for volumetric LED cubes
//!
//! # Commands
//!
//! - `cubelight render` - Run the engine and write concatenated RGB frames
//! - `cubelight list` - Print every scene, pattern and effect key
//! - `cubelight config` - Print the default configuration as TOML
//!
//! # Usage
//!
//! ```bash
//! # Two seconds of a torus with a plasma effect at 30 fps
//! cubelight render --config cube.toml --frames 60 --fps 30 \
//!     --scene shapeMorph --pattern torus --effect plasma --out frames.bin
//!
//! # Start a config file from the defaults
//! cubelight config > cube.toml
//! ```
//!
//! Each frame is `size_x * size_y * size_z * 3` bytes in voxel index order.

mod config;
mod list;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Cubelight CLI - Headless scene renderer for LED cubes
#[derive(Parser)]
#[command(name = "cubelight")]
#[command(about = "Headless scene renderer for volumetric LED cubes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine and write frames
    Render(render::RenderArgs),

    /// Print every scene, pattern and effect key
    List,

    /// Print the default configuration as TOML
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render::execute(args),
        Commands::List => list::execute(),
        Commands::Config => config::execute(),
    }
}
