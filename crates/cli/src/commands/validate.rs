//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{FrameFormat, ReadoutConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    clock_rate_hz: u64,
    error_threshold: u64,
    stream_count: usize,
    pacman_streams: usize,
    mpd_streams: usize,
    toad_streams: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(CliError::config_not_found(&args.config).to_string()),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            let count = |format: FrameFormat| {
                config
                    .streams
                    .iter()
                    .filter(|s| s.format == format)
                    .count()
            };

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    clock_rate_hz: config.clock.rate_hz.hz(),
                    error_threshold: config.continuity.error_threshold,
                    stream_count: config.streams.len(),
                    pacman_streams: count(FrameFormat::Pacman),
                    mpd_streams: count(FrameFormat::Mpd),
                    toad_streams: count(FrameFormat::Toad),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &ReadoutConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.continuity.error_threshold == 0 {
        warnings.push(
            "continuity.error_threshold is 0 - the first break escalates immediately".to_string(),
        );
    }

    for stream in &config.streams {
        if stream.format == FrameFormat::Toad {
            warnings.push(format!(
                "Stream '{}' is TOAD - timestamp ordering is recorded but never checked",
                stream.id
            ));
        }
        if stream.clock_rate_hz.is_some() && stream.format != FrameFormat::Pacman {
            warnings.push(format!(
                "Stream '{}' sets clock_rate_hz but {} timestamps are already in ticks",
                stream.id, stream.format
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Clock: {} Hz", summary.clock_rate_hz);
            println!("  Error threshold: {}", summary.error_threshold);
            println!(
                "  Streams: {} (pacman: {}, mpd: {}, toad: {})",
                summary.stream_count,
                summary.pacman_streams,
                summary.mpd_streams,
                summary.toad_streams
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_config_summary() {
        let file = config_file(
            r#"
[[streams]]
id = "pacman-0"
format = "pacman"

[[streams]]
id = "toad-0"
format = "toad"
"#,
        );
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };

        let result = validate_config(&args);
        assert!(result.valid);
        let summary = result.summary.unwrap();
        assert_eq!(summary.stream_count, 2);
        assert_eq!(summary.toad_streams, 1);
        assert_eq!(summary.clock_rate_hz, 50_000_000);
        assert_eq!(result.warnings.unwrap().len(), 1);
        assert!(run_validate(&args).is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let file = config_file("[clock]\nrate_hz = 0\n\n[[streams]]\nid = \"a\"\nformat = \"mpd\"\n");
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        };

        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("clock.rate_hz"));
        assert!(run_validate(&args).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs {
            config: dir.path().join("nope.toml"),
            json: false,
        };
        let result = validate_config(&args);
        assert!(result.error.unwrap().contains("not found"));
    }
}
