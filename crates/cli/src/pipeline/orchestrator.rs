//! Pipeline orchestrator - capture reader -> adapter -> frame processor.
//!
//! The reader runs as its own task and hands raw records to the processing
//! loop over a bounded `async-channel`, the same hand-off a live receiver
//! would use.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use bytes::Bytes;
use continuity::FrameProcessor;
use contracts::{FrameAdapter, ReadoutConfig};
use frame_adapters::AnyFrame;
use tracing::{debug, info, instrument, warn};

use super::{CaptureReader, PipelineStats};
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub readout: ReadoutConfig,

    /// Stream the capture belongs to
    pub stream_id: String,

    pub capture_path: PathBuf,

    /// Maximum number of frames to process (None = all)
    pub max_frames: Option<u64>,

    /// Channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Dump PACMAN message contents at debug level
    pub inspect: bool,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the replay to completion
    #[instrument(name = "replay", skip(self), fields(stream_id = %self.config.stream_id))]
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let mut processor =
            FrameProcessor::<AnyFrame>::from_config(&self.config.readout, &self.config.stream_id)
                .context("Failed to build frame processor")?;

        let stream_id = processor.stream_id().clone();
        let format = processor.format();
        info!(
            format = %format,
            clock = %processor.clock(),
            threshold = processor.monitor().threshold(),
            "Frame processor configured"
        );

        let reader = CaptureReader::open(&self.config.capture_path).await?;
        let (tx, rx) = async_channel::bounded::<Bytes>(self.config.buffer_size.max(1));

        let reader_handle = tokio::spawn(async move {
            let mut reader = reader;
            let mut records = 0u64;
            while let Some(record) = reader.next_record().await? {
                records += 1;
                if tx.send(record).await.is_err() {
                    debug!(records, "Processing loop closed the channel");
                    break;
                }
            }
            Ok::<_, CliError>((records, reader.offset()))
        });

        let mut frame = AnyFrame::new(format, processor.clock());
        let mut stats = PipelineStats::new(stream_id.clone(), format);

        while let Ok(record) = rx.recv().await {
            stats.records_read += 1;

            if let Err(e) = frame.load(&record) {
                stats.loads_rejected += 1;
                stats.aggregator.record_rejected(&stream_id, format);
                observability::record_load_rejected(&stream_id, format);
                warn!(record = stats.records_read, error = %e, "Frame rejected");
                continue;
            }

            stats.aggregator.record_loaded(&stream_id, format, record.len());
            observability::record_frame_loaded(&stream_id, format, record.len());

            if self.config.inspect {
                if let AnyFrame::Pacman(message) = &frame {
                    message.inspect();
                }
            }

            processor.process(&frame);
            stats.frames_processed += 1;

            if let Some(max) = self.config.max_frames {
                if stats.frames_processed >= max {
                    info!(frames = stats.frames_processed, "Reached max frames limit");
                    break;
                }
            }
        }
        rx.close();

        let (records, bytes) = reader_handle
            .await
            .map_err(|e| CliError::pipeline_execution(format!("capture reader panicked: {e}")))??;
        debug!(records, bytes, "Capture reader finished");

        stats.continuity = processor.state();
        stats
            .aggregator
            .update(&stream_id, format, stats.continuity);
        stats.duration = start_time.elapsed();

        info!(
            frames = stats.frames_processed,
            rejected = stats.loads_rejected,
            continuity_errors = stats.continuity.error_count,
            degraded = stats.degraded(),
            duration_secs = stats.duration.as_secs_f64(),
            "Replay complete"
        );

        Ok(stats)
    }
}
