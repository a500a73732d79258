//! ContinuityState - point-in-time view of one stream's continuity monitor

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Monitor health. `Degraded` is terminal for the lifetime of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuityHealth {
    #[default]
    Healthy,
    Degraded,
}

/// Snapshot of continuity counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContinuityState {
    /// Frames seen by the monitor, checked or not
    pub frames_checked: u64,

    /// Non-increasing timestamp transitions observed
    pub error_count: u64,

    /// The one-time integrity error has been raised
    pub problem_reported: bool,

    /// Timestamp the most recent frame was checked against
    pub previous_timestamp: Timestamp,

    /// Timestamp of the most recently processed frame
    pub current_timestamp: Timestamp,
}

impl ContinuityState {
    pub fn health(&self) -> ContinuityHealth {
        if self.problem_reported {
            ContinuityHealth::Degraded
        } else {
            ContinuityHealth::Healthy
        }
    }
}
