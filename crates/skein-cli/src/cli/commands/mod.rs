pub mod config;
pub mod threads;
pub mod view;

use std::path::Path;

use anyhow::{Context, Result};
use skein_core::client::MemoryClient;
use skein_core::config::Config;

/// Loads `--fixture`, else the configured fixture, else the built-in demo.
pub fn load_client(config: &Config, fixture: Option<&Path>) -> Result<MemoryClient> {
    match fixture.or(config.fixture.as_deref()) {
        Some(path) => MemoryClient::load(path)
            .with_context(|| format!("load fixture {}", path.display())),
        None => MemoryClient::demo().context("load demo fixture"),
    }
}
