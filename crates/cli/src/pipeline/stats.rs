//! Replay statistics.

use std::time::Duration;

use contracts::{ContinuityState, FrameFormat, StreamId, Timestamp};
use observability::ContinuityAggregator;
use serde::Serialize;

/// Statistics from a replay run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub stream_id: StreamId,
    pub format: FrameFormat,

    /// Records read from the capture
    pub records_read: u64,

    /// Frames loaded and passed through the processor
    pub frames_processed: u64,

    /// Records rejected by the adapter (`InvalidDataSize`)
    pub loads_rejected: u64,

    /// Final monitor snapshot
    pub continuity: ContinuityState,

    pub duration: Duration,

    pub aggregator: ContinuityAggregator,
}

impl PipelineStats {
    pub fn new(stream_id: StreamId, format: FrameFormat) -> Self {
        Self {
            stream_id,
            format,
            records_read: 0,
            frames_processed: 0,
            loads_rejected: 0,
            continuity: ContinuityState::default(),
            duration: Duration::ZERO,
            aggregator: ContinuityAggregator::new(),
        }
    }

    /// Frames per second throughput
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_processed as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn degraded(&self) -> bool {
        self.continuity.problem_reported
    }

    pub fn report(&self) -> ReplayReport {
        ReplayReport {
            stream_id: self.stream_id.to_string(),
            format: self.format,
            records_read: self.records_read,
            frames_processed: self.frames_processed,
            loads_rejected: self.loads_rejected,
            continuity_errors: self.continuity.error_count,
            degraded: self.degraded(),
            last_timestamp: self.continuity.current_timestamp,
            duration_secs: self.duration.as_secs_f64(),
        }
    }

    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Replay Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Stream: {} ({})", self.stream_id, self.format);
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Records read: {}", self.records_read);
        println!("   ├─ Frames processed: {}", self.frames_processed);
        println!("   ├─ Rejected loads: {}", self.loads_rejected);
        println!("   └─ FPS: {:.2}", self.fps());

        println!("\n📈 Continuity");
        println!("   ├─ Errors: {}", self.continuity.error_count);
        println!("   ├─ State: {:?}", self.continuity.health());
        println!("   └─ Last timestamp: {}", self.continuity.current_timestamp);

        println!("\n{}", self.aggregator.summary());
    }
}

/// Serializable replay summary
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub stream_id: String,
    pub format: FrameFormat,
    pub records_read: u64,
    pub frames_processed: u64,
    pub loads_rejected: u64,
    pub continuity_errors: u64,
    pub degraded: bool,
    pub last_timestamp: Timestamp,
    pub duration_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_and_fps() {
        let mut stats = PipelineStats::new("mpd-0".into(), FrameFormat::Mpd);
        stats.frames_processed = 50;
        stats.records_read = 51;
        stats.loads_rejected = 1;
        stats.duration = Duration::from_secs(2);
        stats.continuity = ContinuityState {
            frames_checked: 50,
            error_count: 3,
            problem_reported: false,
            previous_timestamp: 880,
            current_timestamp: 900,
        };

        assert!((stats.fps() - 25.0).abs() < 1e-9);
        let report = stats.report();
        assert_eq!(report.continuity_errors, 3);
        assert!(!report.degraded);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["format"], "mpd");
        assert_eq!(json["last_timestamp"], 900);
    }

    #[test]
    fn test_fps_zero_duration() {
        let stats = PipelineStats::new("toad-0".into(), FrameFormat::Toad);
        assert_eq!(stats.fps(), 0.0);
    }
}
