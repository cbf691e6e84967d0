//! Structured logging.
//!
//! The TUI owns the terminal, so logs go to a file under
//! `${SKEIN_HOME}/logs/skein.log` through a non-blocking writer.
//!
//! Filter resolution order:
//! 1. `SKEIN_LOG` environment variable
//! 2. `log_filter` from config
//! 3. `skein=info`

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::{Config, paths};

pub const DEFAULT_FILTER: &str = "skein=info";
pub const LOG_FILE_NAME: &str = "skein.log";

/// Picks the filter directive from the environment, then config.
pub fn resolve_filter(config: &Config) -> String {
    std::env::var("SKEIN_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| config.log_filter.clone())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Installs the global subscriber writing to the default logs directory.
///
/// Keep the returned guard alive for the lifetime of the program; dropping it
/// flushes pending lines.
///
/// # Errors
/// Returns an error if the logs directory cannot be created.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), &resolve_filter(config))
}

/// Installs the global subscriber writing into `dir`.
///
/// A second call in the same process leaves the first subscriber in place.
///
/// # Errors
/// Returns an error if `dir` cannot be created.
pub fn init_in(dir: &Path, filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_filter_used_when_env_unset() {
        // SKEIN_LOG is not set in the test environment.
        if std::env::var("SKEIN_LOG").is_ok() {
            return;
        }
        let config = Config {
            log_filter: Some("skein=debug".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_filter(&config), "skein=debug");
        assert_eq!(resolve_filter(&Config::default()), DEFAULT_FILTER);
    }

    #[test]
    fn test_init_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let _guard = init_in(&logs, "not a [valid filter").unwrap();
        assert!(logs.is_dir());
    }
}
