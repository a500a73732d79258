//! 读出指标收集
//!
//! 基于 `metrics` facade 的薄封装，以及用于运行结束报告的内存聚合器。

use std::collections::BTreeMap;
use std::fmt;

use contracts::{ContinuityState, FrameFormat, StreamId, Timestamp};
use metrics::{counter, gauge, histogram};

/// 记录一帧成功加载
pub fn record_frame_loaded(stream_id: &StreamId, format: FrameFormat, bytes: usize) {
    counter!(
        "readout_frames_loaded_total",
        "stream_id" => stream_id.to_string(),
        "format" => format.name()
    )
    .increment(1);

    histogram!(
        "readout_frame_size_bytes",
        "stream_id" => stream_id.to_string()
    )
    .record(bytes as f64);
}

/// 记录因 `InvalidDataSize` 被拒绝的加载
pub fn record_load_rejected(stream_id: &StreamId, format: FrameFormat) {
    counter!(
        "readout_loads_rejected_total",
        "stream_id" => stream_id.to_string(),
        "format" => format.name()
    )
    .increment(1);
}

/// 记录一次时间戳不递增的跳变
pub fn record_continuity_break(stream_id: &StreamId) {
    counter!(
        "readout_continuity_breaks_total",
        "stream_id" => stream_id.to_string()
    )
    .increment(1);
}

/// 记录 stream 唯一一次的完整性错误上报
pub fn record_continuity_escalation(stream_id: &StreamId) {
    counter!(
        "readout_continuity_escalations_total",
        "stream_id" => stream_id.to_string()
    )
    .increment(1);

    gauge!(
        "readout_stream_degraded",
        "stream_id" => stream_id.to_string()
    )
    .set(1.0);
}

/// 发布 stream 最后处理的时间戳
pub fn record_last_timestamp(stream_id: &StreamId, timestamp: Timestamp) {
    gauge!(
        "readout_last_timestamp_ticks",
        "stream_id" => stream_id.to_string()
    )
    .set(timestamp as f64);
}

/// Per-stream totals kept by [`ContinuityAggregator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamTotals {
    pub format: FrameFormat,
    pub frames_loaded: u64,
    pub loads_rejected: u64,
    pub continuity: ContinuityState,
}

impl StreamTotals {
    fn new(format: FrameFormat) -> Self {
        Self {
            format,
            frames_loaded: 0,
            loads_rejected: 0,
            continuity: ContinuityState::default(),
        }
    }
}

/// 连续性指标聚合器
///
/// 在内存中聚合逐 stream 的加载计数与最新的 monitor 快照。
#[derive(Debug, Clone, Default)]
pub struct ContinuityAggregator {
    streams: BTreeMap<StreamId, StreamTotals>,
    frame_size: RunningStats,
}

impl ContinuityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, stream_id: &StreamId, format: FrameFormat) -> &mut StreamTotals {
        self.streams
            .entry(stream_id.clone())
            .or_insert_with(|| StreamTotals::new(format))
    }

    pub fn record_loaded(&mut self, stream_id: &StreamId, format: FrameFormat, bytes: usize) {
        self.entry(stream_id, format).frames_loaded += 1;
        self.frame_size.push(bytes as f64);
    }

    pub fn record_rejected(&mut self, stream_id: &StreamId, format: FrameFormat) {
        self.entry(stream_id, format).loads_rejected += 1;
    }

    /// Replace the stored monitor snapshot of a stream
    pub fn update(&mut self, stream_id: &StreamId, format: FrameFormat, state: ContinuityState) {
        self.entry(stream_id, format).continuity = state;
    }

    pub fn stream(&self, stream_id: &str) -> Option<&StreamTotals> {
        self.streams.get(stream_id)
    }

    pub fn summary(&self) -> ContinuitySummary {
        let mut summary = ContinuitySummary {
            frame_size_bytes: StatsSummary::from(&self.frame_size),
            ..Default::default()
        };

        for (id, totals) in &self.streams {
            summary.total_frames += totals.frames_loaded;
            summary.total_rejected += totals.loads_rejected;
            summary.total_breaks += totals.continuity.error_count;
            if totals.continuity.problem_reported {
                summary.degraded_streams.push(id.clone());
            }
        }
        summary.streams = self
            .streams
            .iter()
            .map(|(id, totals)| (id.clone(), *totals))
            .collect();

        summary
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 聚合报告
#[derive(Debug, Clone, Default)]
pub struct ContinuitySummary {
    pub total_frames: u64,
    pub total_rejected: u64,
    pub total_breaks: u64,
    pub degraded_streams: Vec<StreamId>,
    pub frame_size_bytes: StatsSummary,
    pub streams: Vec<(StreamId, StreamTotals)>,
}

impl fmt::Display for ContinuitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Readout Continuity Summary ===")?;
        writeln!(f, "Frames loaded: {}", self.total_frames)?;
        writeln!(f, "Rejected loads: {}", self.total_rejected)?;
        writeln!(f, "Continuity errors: {}", self.total_breaks)?;
        writeln!(f, "Frame size (bytes): {}", self.frame_size_bytes)?;

        for (id, totals) in &self.streams {
            writeln!(
                f,
                "  {} [{}]: frames={}, rejected={}, errors={}, state={:?}, last_ts={}",
                id,
                totals.format,
                totals.frames_loaded,
                totals.loads_rejected,
                totals.continuity.error_count,
                totals.continuity.health(),
                totals.continuity.current_timestamp
            )?;
        }

        if !self.degraded_streams.is_empty() {
            let names: Vec<&str> = self.degraded_streams.iter().map(|s| s.as_str()).collect();
            writeln!(f, "Degraded streams: {}", names.join(", "))?;
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计 (Welford 算法)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
