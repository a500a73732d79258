//! ReadoutConfig - Config Loader output
//!
//! Describes the readout streams, their wire formats, the clock domain and the
//! continuity check tuning supplied at pipeline configuration time.

use serde::{Deserialize, Serialize};

use crate::{ClockRate, FrameFormat, StreamId};

/// Default number of continuity breaks tolerated before escalation
pub const DEFAULT_ERROR_THRESHOLD: u64 = 1000;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete readout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadoutConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Global clock domain
    #[serde(default)]
    pub clock: ClockConfig,

    /// Continuity check tuning
    #[serde(default)]
    pub continuity: ContinuityConfig,

    /// Readout streams
    pub streams: Vec<StreamConfig>,
}

impl ReadoutConfig {
    /// Look up a stream by id
    pub fn stream(&self, id: &str) -> Option<&StreamConfig> {
        self.streams.iter().find(|s| s.id == id)
    }

    /// Clock rate for a stream, honoring its per-stream override
    pub fn effective_clock(&self, stream: &StreamConfig) -> ClockRate {
        stream.clock_rate_hz.unwrap_or(self.clock.rate_hz)
    }
}

/// Clock domain configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Ticks per second of the timing system
    #[serde(default)]
    pub rate_hz: ClockRate,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            rate_hz: ClockRate::default(),
        }
    }
}

/// Continuity monitor configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContinuityConfig {
    /// Breaks tolerated before the one-time integrity error is raised
    #[serde(default = "default_error_threshold")]
    pub error_threshold: u64,
}

impl Default for ContinuityConfig {
    fn default() -> Self {
        Self {
            error_threshold: DEFAULT_ERROR_THRESHOLD,
        }
    }
}

fn default_error_threshold() -> u64 {
    DEFAULT_ERROR_THRESHOLD
}

/// One readout stream (one front-end link)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Unique identifier
    pub id: StreamId,

    /// Wire format produced by the front-end
    pub format: FrameFormat,

    /// Clock rate override for detectors running off a different clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_rate_hz: Option<ClockRate>,
}
