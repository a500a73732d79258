//! FrameAdapter - uniform access to one raw detector frame
//!
//! Every supported wire format implements [`FrameAdapter`]. The latency buffer,
//! the continuity monitor and fragment assembly only ever talk to this trait.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FrameError;

/// Tick count in the global clock domain
pub type Timestamp = u64;

/// Detector subsystem tag attached to every fragment built from these frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    Unknown,
    DetectorReadout,
    HwSignalsInterface,
    Trigger,
}

/// Fragment payload type tag consumed by fragment assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentType {
    Unknown,
    Pacman,
    Mpd,
    Toad,
}

/// Supported front-end wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameFormat {
    /// Large buffered multi-packet messages (charge readout)
    Pacman,
    /// Small event frames (light readout)
    Mpd,
    /// Single-packet overlay frames
    Toad,
}

impl FrameFormat {
    /// All formats, in declaration order
    pub const ALL: [FrameFormat; 3] = [Self::Pacman, Self::Mpd, Self::Toad];

    /// Short lowercase name, matches the serde representation
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pacman => "pacman",
            Self::Mpd => "mpd",
            Self::Toad => "toad",
        }
    }

    pub const fn subsystem(self) -> Subsystem {
        Subsystem::DetectorReadout
    }

    pub const fn fragment_type(self) -> FragmentType {
        match self {
            Self::Pacman => FragmentType::Pacman,
            Self::Mpd => FragmentType::Mpd,
            Self::Toad => FragmentType::Toad,
        }
    }

    /// Reserved for fixed-rate frame validation; no consumer yet.
    pub const fn expected_tick_difference(self) -> u64 {
        0
    }

    /// Whether the front-end guarantees increasing timestamps in arrival order.
    ///
    /// TOAD frames can legitimately arrive out of order.
    pub const fn timestamps_monotonic(self) -> bool {
        !matches!(self, Self::Toad)
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform adapter over one wire frame.
///
/// Implementations own a copy of the frame bytes. Apart from [`load`], every
/// method is total: an empty or truncated buffer yields sentinel values (a zero
/// timestamp) instead of an error, so the per-frame path never fails.
///
/// [`load`]: FrameAdapter::load
pub trait FrameAdapter: Send + Sync {
    /// Wire format of this adapter
    fn format(&self) -> FrameFormat;

    /// Replace the adapter contents with a copy of `data`.
    ///
    /// # Errors
    /// Fixed-capacity formats return [`FrameError::InvalidDataSize`] when
    /// `data` is larger than the buffer; the buffer is then left untouched.
    fn load(&mut self, data: &[u8]) -> Result<(), FrameError>;

    /// Canonical timestamp in ticks, `0` when the header cannot be read
    fn timestamp(&self) -> Timestamp;

    /// First timestamp of the frame (frames carry a single message)
    fn first_timestamp(&self) -> Timestamp {
        self.timestamp()
    }

    /// Overwrite the native timestamp field, where the format supports it
    fn set_first_timestamp(&mut self, ts: Timestamp);

    /// Current buffer length in bytes
    fn payload_size(&self) -> usize;

    fn frame_size(&self) -> usize {
        self.payload_size()
    }

    /// Each adapter instance wraps exactly one wire frame
    fn num_frames(&self) -> usize {
        1
    }

    fn subsystem(&self) -> Subsystem {
        self.format().subsystem()
    }

    fn fragment_type(&self) -> FragmentType {
        self.format().fragment_type()
    }

    /// Order two frames by timestamp (ties compare equal)
    fn compare(&self, other: &Self) -> Ordering
    where
        Self: Sized,
    {
        self.timestamp().cmp(&other.timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tags() {
        for format in FrameFormat::ALL {
            assert_eq!(format.subsystem(), Subsystem::DetectorReadout);
            assert_eq!(format.expected_tick_difference(), 0);
        }
        assert_eq!(FrameFormat::Pacman.fragment_type(), FragmentType::Pacman);
        assert_eq!(FrameFormat::Mpd.fragment_type(), FragmentType::Mpd);
        assert_eq!(FrameFormat::Toad.fragment_type(), FragmentType::Toad);
    }

    #[test]
    fn test_only_toad_is_unordered() {
        assert!(FrameFormat::Pacman.timestamps_monotonic());
        assert!(FrameFormat::Mpd.timestamps_monotonic());
        assert!(!FrameFormat::Toad.timestamps_monotonic());
    }

    #[test]
    fn test_format_serde_matches_name() {
        for format in FrameFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.name()));
        }
    }
}
