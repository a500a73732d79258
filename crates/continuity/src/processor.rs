//! Per-stream frame processor
//!
//! Runs the preprocess stages of one readout stream for every frame taken off
//! the wire. The continuity monitor is always the first stage.

use std::fmt;
use std::sync::Arc;

use contracts::{
    ClockRate, ContinuityState, ContractError, FrameAdapter, FrameFormat, ReadoutConfig, StreamId,
};
use tracing::{instrument, trace, warn};

use crate::monitor::{CheckOutcome, ContinuityCounters, ContinuityMonitor, LastProcessed};

/// Log window used to render absolute tick values, in seconds
const LOG_WINDOW_SECS: u64 = 1000;

/// Extra preprocess stage run after the continuity check
pub type PreprocessTask<F> = Box<dyn FnMut(&F) + Send>;

pub struct FrameProcessor<F: FrameAdapter> {
    stream_id: StreamId,
    format: FrameFormat,
    clock: ClockRate,
    monitor: ContinuityMonitor,
    tasks: Vec<PreprocessTask<F>>,
    format_mismatches: u64,
}

impl<F: FrameAdapter> FrameProcessor<F> {
    pub fn new(stream_id: StreamId, format: FrameFormat, clock: ClockRate, threshold: u64) -> Self {
        Self {
            monitor: ContinuityMonitor::new(stream_id.clone(), format, threshold),
            stream_id,
            format,
            clock,
            tasks: Vec::new(),
            format_mismatches: 0,
        }
    }

    /// Build the processor of stream `stream_id` from the readout configuration
    pub fn from_config(config: &ReadoutConfig, stream_id: &str) -> Result<Self, ContractError> {
        let stream = config
            .stream(stream_id)
            .ok_or_else(|| ContractError::stream_not_found(stream_id))?;

        Ok(Self::new(
            stream.id.clone(),
            stream.format,
            config.effective_clock(stream),
            config.continuity.error_threshold,
        ))
    }

    /// Append a stage run on every frame after the continuity check
    pub fn add_preprocess_task(&mut self, task: impl FnMut(&F) + Send + 'static) {
        self.tasks.push(Box::new(task));
    }

    #[instrument(
        level = "trace",
        name = "frame_processor_process",
        skip(self, frame),
        fields(stream_id = %self.stream_id)
    )]
    pub fn process(&mut self, frame: &F) -> CheckOutcome {
        if frame.format() != self.format {
            self.format_mismatches += 1;
            warn!(
                expected = %self.format,
                actual = %frame.format(),
                mismatches = self.format_mismatches,
                "frame format does not match stream, skipped"
            );
            return CheckOutcome::FormatMismatch;
        }

        let ts = frame.timestamp();
        trace!(
            timestamp = ts,
            window_secs = self.clock.seconds_within_window(ts, LOG_WINDOW_SECS),
            size = frame.payload_size(),
            "received frame"
        );

        let outcome = self.monitor.check(frame);
        for task in &mut self.tasks {
            task(frame);
        }
        outcome
    }

    pub fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    pub fn format(&self) -> FrameFormat {
        self.format
    }

    pub fn clock(&self) -> ClockRate {
        self.clock
    }

    pub fn monitor(&self) -> &ContinuityMonitor {
        &self.monitor
    }

    /// Frames skipped because their format differs from the stream's
    pub fn format_mismatches(&self) -> u64 {
        self.format_mismatches
    }

    /// Number of stages including the continuity check
    pub fn stage_count(&self) -> usize {
        self.tasks.len() + 1
    }

    /// Handle the scheduler reads the last processed timestamp from
    pub fn last_processed(&self) -> LastProcessed {
        self.monitor.counters().last_processed().clone()
    }

    pub fn counters(&self) -> Arc<ContinuityCounters> {
        self.monitor.counters()
    }

    pub fn state(&self) -> ContinuityState {
        self.monitor.state()
    }
}

impl<F: FrameAdapter> fmt::Debug for FrameProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameProcessor")
            .field("stream_id", &self.stream_id)
            .field("format", &self.format)
            .field("clock", &self.clock)
            .field("stages", &self.stage_count())
            .finish()
    }
}
