//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skein_core::config::{self, Config};
use skein_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "skein")]
#[command(version)]
#[command(about = "Terminal thread panel for chat rooms")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of $SKEIN_HOME/config.toml
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
}

/// Where room data comes from.
#[derive(clap::Args, Debug, Clone, Default)]
struct SourceArgs {
    /// JSON fixture of rooms, events and threads (default: built-in demo)
    #[arg(long, value_name = "PATH")]
    fixture: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the thread panel on an event (default command)
    View {
        #[command(flatten)]
        source: SourceArgs,

        /// Room to open (default: first room)
        #[arg(long, value_name = "ROOM_ID")]
        room: Option<String>,

        /// Event whose thread is shown (default: first thread root)
        #[arg(long, value_name = "EVENT_ID")]
        event: Option<String>,
    },

    /// List thread roots per room
    Threads {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::paths::config_path);

    // config commands must work even when the file is broken
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            ConfigCommands::Path => commands::config::path(&config_path),
            ConfigCommands::Init => commands::config::init(&config_path),
        };
    }

    let config = Config::load_from(&config_path).context("load config")?;
    let _log_guard = logging::init(&config).context("init logging")?;
    tracing::debug!(config = %config_path.display(), "skein starting");

    match cli.command {
        None => commands::view::run(&config, None, None, None),
        Some(Commands::View {
            source,
            room,
            event,
        }) => commands::view::run(
            &config,
            source.fixture.as_deref(),
            room.as_deref(),
            event.as_deref(),
        ),
        Some(Commands::Threads { source }) => {
            commands::threads::list(&config, source.fixture.as_deref())
        }
        Some(Commands::Config { .. }) => Ok(()),
    }
}
