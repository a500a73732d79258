//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Readout Monitor - frame timestamp and continuity tools for detector readout streams
#[derive(Parser, Debug)]
#[command(
    name = "readout-monitor",
    author,
    version,
    about = "Detector readout frame inspection and continuity monitoring",
    long_about = "Loads a readout configuration, decodes PACMAN / MPD / TOAD frames and \n\
                  checks the timestamp continuity of recorded streams."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "READOUT_MONITOR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "READOUT_MONITOR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a capture file through one stream's frame processor
    Replay(ReplayArgs),

    /// Validate configuration file
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `replay` command
#[derive(Parser, Debug, Clone)]
pub struct ReplayArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "readout.toml",
        env = "READOUT_MONITOR_CONFIG"
    )]
    pub config: PathBuf,

    /// Stream id the capture was recorded from
    #[arg(short, long)]
    pub stream: String,

    /// Capture file of length-prefixed frames
    #[arg(long)]
    pub capture: PathBuf,

    /// Maximum number of frames to process (0 = all)
    #[arg(long, default_value = "0")]
    pub max_frames: u64,

    /// Channel buffer size between reader and processor
    #[arg(long, default_value = "100", env = "READOUT_MONITOR_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "READOUT_MONITOR_METRICS_PORT")]
    pub metrics_port: u16,

    /// Dump PACMAN message words at debug level
    #[arg(long)]
    pub inspect: bool,

    /// Exit with an error when the stream ends degraded
    #[arg(long)]
    pub fail_on_degraded: bool,

    /// Output replay statistics as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "readout.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "readout.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
