//! `replay` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ReplayArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `replay` command
pub async fn run_replay(args: &ReplayArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let readout = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        streams = readout.streams.len(),
        stream = %args.stream,
        capture = %args.capture.display(),
        "Configuration loaded"
    );

    let pipeline = Pipeline::new(PipelineConfig {
        readout,
        stream_id: args.stream.clone(),
        capture_path: args.capture.clone(),
        max_frames: (args.max_frames != 0).then_some(args.max_frames),
        buffer_size: args.buffer_size,
        metrics_port: (args.metrics_port != 0).then_some(args.metrics_port),
        inspect: args.inspect,
    });

    let stats = tokio::select! {
        result = pipeline.run() => result.context("Replay failed")?,
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping replay");
            return Ok(());
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&stats.report())
            .context("Failed to serialize replay report")?;
        println!("{}", json);
    } else {
        stats.print_summary();
    }

    if args.fail_on_degraded && stats.degraded() {
        anyhow::bail!(
            "Stream '{}' is degraded: {} continuity errors",
            stats.stream_id,
            stats.continuity.error_count
        );
    }

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode_record;
    use frame_adapters::MpdHeader;
    use std::io::Write;

    fn replay_args(config: &std::path::Path, capture: &std::path::Path) -> ReplayArgs {
        ReplayArgs {
            config: config.to_path_buf(),
            stream: "mpd-0".to_string(),
            capture: capture.to_path_buf(),
            max_frames: 0,
            buffer_size: 8,
            metrics_port: 0,
            inspect: false,
            fail_on_degraded: true,
            json: true,
        }
    }

    fn fixtures(timestamps: &[u64]) -> (tempfile::NamedTempFile, tempfile::NamedTempFile) {
        let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        config
            .write_all(
                b"[continuity]\nerror_threshold = 1\n\n[[streams]]\nid = \"mpd-0\"\nformat = \"mpd\"\n",
            )
            .unwrap();

        let mut capture = tempfile::NamedTempFile::new().unwrap();
        for &ts in timestamps {
            let header = MpdHeader {
                sync: 0,
                event_length: 0,
                timestamp: ts,
            };
            capture.write_all(&encode_record(&header.encode())).unwrap();
        }
        capture.flush().unwrap();
        (config, capture)
    }

    #[tokio::test]
    async fn test_replay_healthy_stream() {
        let (config, capture) = fixtures(&[1, 2, 3, 4]);
        let args = replay_args(config.path(), capture.path());
        assert!(run_replay(&args).await.is_ok());
    }

    #[tokio::test]
    async fn test_replay_fails_on_degraded() {
        let (config, capture) = fixtures(&[5, 4, 3, 2]);
        let args = replay_args(config.path(), capture.path());
        let err = run_replay(&args).await.unwrap_err();
        assert!(err.to_string().contains("degraded"));
    }

    #[tokio::test]
    async fn test_replay_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = replay_args(&dir.path().join("none.toml"), &dir.path().join("none.cap"));
        let err = run_replay(&args).await.unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
