//! Configuration management for skein.
//!
//! Loads configuration from ${SKEIN_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::permalinks::DEFAULT_PERMALINK_BASE;

pub mod paths {
    //! Path resolution for skein configuration and data directories.
    //!
    //! SKEIN_HOME resolution order:
    //! 1. SKEIN_HOME environment variable (if set)
    //! 2. ~/.config/skein (default)

    use std::path::PathBuf;

    pub fn skein_home() -> PathBuf {
        if let Ok(home) = std::env::var("SKEIN_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".skein"),
            |h| h.join(".config").join("skein"),
        )
    }

    pub fn config_path() -> PathBuf {
        skein_home().join("config.toml")
    }

    pub fn logs_dir() -> PathBuf {
        skein_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sender id used for replies written in the composer.
    pub user_id: String,

    /// Base URL for permalinks.
    pub permalink_base: String,

    /// Tracing filter directive (overridden by SKEIN_LOG).
    pub log_filter: Option<String>,

    /// Idle tick interval of the TUI loop in milliseconds.
    pub tick_ms: u64,

    /// Fixture loaded when `--fixture` is not given.
    pub fixture: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: Self::DEFAULT_USER_ID.to_string(),
            permalink_base: DEFAULT_PERMALINK_BASE.to_string(),
            log_filter: None,
            tick_ms: Self::DEFAULT_TICK_MS,
            fixture: None,
        }
    }
}

impl Config {
    const DEFAULT_USER_ID: &str = "@me:localhost";
    const DEFAULT_TICK_MS: u64 = 100;
    const MIN_TICK_MS: u64 = 10;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(Self::MIN_TICK_MS))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user_id = \"@bob:example.org\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.user_id, "@bob:example.org");
        assert_eq!(config.permalink_base, DEFAULT_PERMALINK_BASE);
        assert_eq!(config.tick_ms, 100);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_ms = \"fast\"").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_tick_interval_has_floor() {
        let config = Config {
            tick_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
    }
}
