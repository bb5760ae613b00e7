//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Reusable device connection arguments
#[derive(Debug, Clone, Args)]
pub struct DeviceArgs {
    /// Device address (IP, hostname or URL), or use SHELLY_DEVICE env var
    #[arg(short, long, env = "SHELLY_DEVICE")]
    pub device: Option<String>,

    /// Request timeout in seconds [default: 3, or `timeout` from config]
    #[arg(short = 'T', long)]
    pub timeout: Option<u64>,
}

/// Device arguments for commands that address one meter channel
#[derive(Debug, Clone, Args)]
pub struct MeterArgs {
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Meter channel index [default: 0, or `index` from config]
    #[arg(short, long)]
    pub index: Option<usize>,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

/// Time range over stored readings.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD`, which covers the
/// whole day.
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// Start of the range (inclusive)
    #[arg(long)]
    pub since: Option<String>,

    /// End of the range (inclusive)
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Parser)]
#[command(name = "shelly")]
#[command(author, version, about = "Logger for Shelly EM energy meters", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Reading database path, or use SHELLY_DB env var
    #[arg(long, global = true, env = "SHELLY_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the device's raw /status document
    Status {
        #[command(flatten)]
        device: DeviceArgs,

        /// Output compact JSON (no pretty-printing)
        #[arg(long)]
        compact: bool,
    },

    /// Print the device's raw /settings document
    Settings {
        #[command(flatten)]
        device: DeviceArgs,

        /// Output compact JSON (no pretty-printing)
        #[arg(long)]
        compact: bool,
    },

    /// Read one meter channel from the device
    Read {
        #[command(flatten)]
        meter: MeterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Poll the device once and store the reading
    Log {
        #[command(flatten)]
        meter: MeterArgs,
    },

    /// Poll and store readings repeatedly
    Watch {
        #[command(flatten)]
        meter: MeterArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Polling interval in seconds
        #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Number of stored readings before exiting (0 for unlimited).
        /// Missed polls do not count; see --max-missed
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,

        /// Give up after this many missed polls in a row (0 to keep trying)
        #[arg(long, default_value = "0")]
        max_missed: u32,
    },

    /// Show stored readings in a time range
    History {
        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Maximum number of rows (most recent first when no range is given)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Chart stored power readings in the terminal
    Plot {
        #[command(flatten)]
        range: RangeArgs,

        /// Chart width in columns
        #[arg(long, default_value = "80", value_parser = clap::value_parser!(u16).range(20..))]
        width: u16,

        /// Chart height in rows
        #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(5..))]
        height: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Default device address
    Device,
    /// Reading database path
    DbPath,
    /// Request timeout in seconds
    Timeout,
    /// Default meter channel index
    Index,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
