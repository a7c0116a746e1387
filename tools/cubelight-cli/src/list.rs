//! List command - print registry keys

use anyhow::Result;
use cubelight_core::{EffectKind, SCENES};

/// Execute the list command
pub fn execute() -> Result<()> {
    println!("Scenes:");
    for scene in SCENES {
        println!("  {} ({})", scene.id, scene.category);
        for pattern in scene.kind.patterns() {
            let marker = if pattern == scene.default_pattern { " *" } else { "" };
            println!("    {pattern}{marker}");
        }
    }

    println!();
    println!("Effects:");
    for effect in EffectKind::ALL {
        println!("  {effect}");
    }
    Ok(())
}
