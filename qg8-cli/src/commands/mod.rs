//! Subcommand implementations.

use anyhow::{Context, Result};
use qg8::CodecConfig;

pub mod dump;
pub mod inspect;
pub mod rewrite;

/// Print a default codec config as JSON, ready to edit and pass to `--config`.
pub fn generate_config_template() -> Result<()> {
    let json = serde_json::to_string_pretty(&CodecConfig::default())
        .context("Failed to serialize config")?;
    println!("{json}");
    Ok(())
}
