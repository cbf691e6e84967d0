//! Config command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use skein_core::config::Config;

pub fn path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

pub fn init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }

    let contents = toml::to_string_pretty(&Config::default()).context("serialize default config")?;
    fs::write(config_path, contents)
        .with_context(|| format!("write config to {}", config_path.display()))?;

    println!("Created config at {}", config_path.display());
    Ok(())
}
