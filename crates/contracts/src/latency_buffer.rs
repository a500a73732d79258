//! LatencyBuffer trait - ordered frame storage interface
//!
//! The buffer itself lives outside these crates. Adapters only need to be
//! comparable by timestamp and expose their size to take part in it.

use crate::{FrameAdapter, Timestamp};

/// Extracts the ordering key of a stored frame.
pub trait TimestampKey<F: ?Sized> {
    fn key(&self, frame: &F) -> Timestamp;
}

/// Key extractor that uses [`FrameAdapter::timestamp`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimestamp;

impl<F: FrameAdapter + ?Sized> TimestampKey<F> for FrameTimestamp {
    #[inline]
    fn key(&self, frame: &F) -> Timestamp {
        frame.timestamp()
    }
}

/// Time-ordered frame store serving range queries.
///
/// Frames are immutable once written. Implementations may be backed by any
/// sorted container.
pub trait LatencyBuffer<F: FrameAdapter> {
    /// Store a frame, returns `false` if it was rejected (buffer full)
    fn write(&mut self, frame: F) -> bool;

    /// Number of stored frames
    fn occupancy(&self) -> usize;

    /// Frames whose timestamp lies in `[start, end]`, in ascending order
    fn frames_between(&self, start: Timestamp, end: Timestamp) -> Vec<&F>;
}
