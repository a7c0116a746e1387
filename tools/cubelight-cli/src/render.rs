//! Render command - drive the engine and stream frames
//!
//! Frames are written back to back with no header; each is
//! `size_x * size_y * size_z * 3` bytes. Without `--out` only per-frame
//! statistics are printed.

use anyhow::{Context, Result};
use clap::Args;
use cubelight_core::{Config, Engine};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for the render command
#[derive(Args)]
pub struct RenderArgs {
    /// Config file (defaults apply when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of frames to render
    #[arg(long, default_value_t = 30)]
    pub frames: u32,

    /// Ticks per second of scene time
    #[arg(long, default_value_t = 30.0)]
    pub fps: f32,

    /// Scene key (overrides the config)
    #[arg(long)]
    pub scene: Option<String>,

    /// Pattern key (overrides the config)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Effect key (overrides the config)
    #[arg(long)]
    pub effect: Option<String>,

    /// Output file for raw RGB frames
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be positive, got {}", args.fps);
    }

    let config = match &args.config {
        Some(path) => cubelight_core::config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    let mut engine = Engine::new(&config).context("Invalid configuration")?;

    let mut params = config.parameter_set();
    if let Some(pattern) = &args.pattern {
        params.set_scene("pattern", pattern.as_str());
    }
    let scene = args.scene.as_deref().unwrap_or(&config.scene.key);
    let effect = args.effect.as_deref().unwrap_or(&config.effect.key);

    let mut out = match &args.out {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => None,
    };

    let mut field = engine.new_field();
    let mut total_active = 0usize;
    for i in 0..args.frames {
        let t = i as f32 / args.fps;
        let active = engine.tick(t, &params, scene, effect, &mut field);
        let frame = engine.colorize(&field);
        total_active += frame.active_count();

        match out.as_mut() {
            Some(writer) => writer
                .write_all(&frame.to_bytes())
                .context("Failed to write frame")?,
            None => println!(
                "frame {i:>5}  t={t:>7.3}  {}/{}  active={}",
                active.kind,
                active.pattern,
                frame.active_count()
            ),
        }
        debug!(frame = i, t, active = frame.active_count(), "frame rendered");
    }

    if let Some(mut writer) = out {
        writer.flush().context("Failed to flush output")?;
    }

    info!(
        frames = args.frames,
        mean_active = total_active / (args.frames.max(1) as usize),
        "render complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(out: Option<PathBuf>) -> RenderArgs {
        RenderArgs {
            config: None,
            frames: 3,
            fps: 30.0,
            scene: Some("waveField".to_string()),
            pattern: Some("plane".to_string()),
            effect: Some("plasma".to_string()),
            out,
        }
    }

    #[test]
    fn test_render_writes_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.bin");
        execute(args(Some(path.clone()))).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let frame_len = 20 * 40 * 20 * 3;
        assert_eq!(bytes.len(), 3 * frame_len);
    }

    #[test]
    fn test_render_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("cube.toml");
        std::fs::write(&config_path, "[grid]\nsize_x = 4\nsize_y = 4\nsize_z = 4\n").unwrap();
        let out_path = dir.path().join("frames.bin");

        let mut render = args(Some(out_path.clone()));
        render.config = Some(config_path);
        execute(render).unwrap();

        assert_eq!(std::fs::read(&out_path).unwrap().len(), 3 * 4 * 4 * 4 * 3);
    }

    #[test]
    fn test_render_rejects_zero_fps() {
        let mut render = args(None);
        render.fps = 0.0;
        assert!(execute(render).is_err());
    }

    #[test]
    fn test_render_missing_config() {
        let mut render = args(None);
        render.config = Some(PathBuf::from("/nonexistent/cube.toml"));
        assert!(execute(render).is_err());
    }
}
