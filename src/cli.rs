//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::default_config_path;

/// Inspect, validate and edit snapmark settings.
#[derive(Parser, Debug)]
#[command(name = "snapmark-config", version, about, long_about = None)]
pub struct Cli {
    /// Path to the settings file (defaults to the platform config directory).
    #[arg(short, long, env = "SNAPMARK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level based on verbosity flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Settings file to operate on.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the settings file and print a report.
    Check,

    /// Print the effective value of every option and shortcut.
    Show(ShowArgs),

    /// Print the effective value of one key (shortcuts as `Shortcuts/<name>`).
    Get {
        /// The key to read.
        key: String,
    },

    /// Store a value (parsed as YAML, so lists are written `[a, b]`).
    Set {
        /// The key to write.
        key: String,
        /// The new value.
        value: String,
    },

    /// Print or change a shortcut binding.
    Shortcut {
        /// The shortcut name, e.g. `undo`.
        name: String,
        /// New key sequence; an empty string unbinds the shortcut.
        sequence: Option<String>,
    },

    /// Reset every general option to its default, keeping shortcuts.
    Reset,

    /// Print the path of the settings file.
    Path,

    /// Render the screenshot filename pattern for the current time.
    #[command(name = "preview-filename")]
    PreviewFilename,

    /// Watch the settings file and report changes until interrupted.
    Watch(WatchArgs),
}

/// Arguments for the show subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print JSON instead of YAML.
    #[arg(long, default_value = "false")]
    pub json: bool,
}

/// Arguments for the watch subcommand.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// How often to poll for queued file events, in milliseconds.
    #[arg(long, default_value = "500")]
    pub interval_ms: u64,
}
