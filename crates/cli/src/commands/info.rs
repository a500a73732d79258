//! `info` command implementation.

use anyhow::{Context, Result};
use continuity::ContinuityPolicy;
use contracts::{FragmentType, FrameFormat, ReadoutConfig, Subsystem};
use frame_adapters::{PacmanFrame, ToadFrame};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    clock_rate_hz: u64,
    error_threshold: u64,
    streams: Vec<StreamInfo>,
}

#[derive(Serialize)]
struct StreamInfo {
    id: String,
    format: FrameFormat,
    subsystem: Subsystem,
    fragment_type: FragmentType,
    clock_rate_hz: u64,
    continuity_checked: bool,
    /// Fixed buffer capacity in bytes, absent for variable-size formats
    #[serde(skip_serializing_if = "Option::is_none")]
    capacity: Option<usize>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&config);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn capacity(format: FrameFormat) -> Option<usize> {
    match format {
        FrameFormat::Pacman => Some(PacmanFrame::CAPACITY),
        FrameFormat::Mpd => None,
        FrameFormat::Toad => Some(ToadFrame::CAPACITY),
    }
}

fn build_config_info(config: &ReadoutConfig) -> ConfigInfo {
    let streams = config
        .streams
        .iter()
        .map(|s| StreamInfo {
            id: s.id.to_string(),
            format: s.format,
            subsystem: s.format.subsystem(),
            fragment_type: s.format.fragment_type(),
            clock_rate_hz: config.effective_clock(s).hz(),
            continuity_checked: ContinuityPolicy::for_format(s.format)
                == ContinuityPolicy::Enforce,
            capacity: capacity(s.format),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", config.version),
        clock_rate_hz: config.clock.rate_hz.hz(),
        error_threshold: config.continuity.error_threshold,
        streams,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Readout Monitor Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⏱  Clock");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Rate: {} Hz", info.clock_rate_hz);
    println!("   └─ Continuity error threshold: {}", info.error_threshold);

    println!("\n📡 Streams ({})", info.streams.len());
    for (i, stream) in info.streams.iter().enumerate() {
        let is_last = i == info.streams.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!("   {} {} ({})", prefix, stream.id, stream.format);
        println!(
            "   {}  ├─ Tags: {:?} / {:?}",
            child_prefix, stream.subsystem, stream.fragment_type
        );
        println!("   {}  ├─ Clock: {} Hz", child_prefix, stream.clock_rate_hz);
        match stream.capacity {
            Some(bytes) => println!("   {}  ├─ Capacity: {} bytes", child_prefix, bytes),
            None => println!("   {}  ├─ Capacity: variable", child_prefix),
        }
        println!(
            "   {}  └─ Continuity: {}",
            child_prefix,
            if stream.continuity_checked {
                "checked"
            } else {
                "record only"
            }
        );
    }

    println!();
}
