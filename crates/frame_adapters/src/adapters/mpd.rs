//! MPD event adapter
//!
//! MPD frames are variable length: a 16-byte header (`sync`, `event_length`,
//! 64-bit `timestamp`) followed by the event payload. The adapter keeps a
//! resizable copy of whatever it was given.

use std::fmt;

use bytes::BufMut;
use contracts::{FragmentType, FrameAdapter, FrameError, FrameFormat, Subsystem, Timestamp};

use crate::adapters::common::{read_u32_le, read_u64_le};

/// Smallest buffer with an interpretable header
pub const MPD_HEADER_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MpdHeader {
    pub sync: u32,
    /// Event length as reported by the front-end
    pub event_length: u32,
    pub timestamp: Timestamp,
}

impl MpdHeader {
    pub fn decode(buf: &[u8]) -> Option<Self> {
        Some(Self {
            sync: read_u32_le(buf, 0)?,
            event_length: read_u32_le(buf, 4)?,
            timestamp: read_u64_le(buf, 8)?,
        })
    }

    pub fn encode(&self) -> [u8; MPD_HEADER_SIZE] {
        let mut out = [0u8; MPD_HEADER_SIZE];
        let mut buf = &mut out[..];
        buf.put_u32_le(self.sync);
        buf.put_u32_le(self.event_length);
        buf.put_u64_le(self.timestamp);
        out
    }
}

/// MPD event adapter (variable-size buffer)
#[derive(Default)]
pub struct MpdFrame {
    data: Vec<u8>,
}

impl MpdFrame {
    pub const SUBSYSTEM: Subsystem = FrameFormat::Mpd.subsystem();
    pub const FRAGMENT_TYPE: FragmentType = FrameFormat::Mpd.fragment_type();
    pub const EXPECTED_TICK_DIFFERENCE: u64 = FrameFormat::Mpd.expected_tick_difference();

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// `None` when fewer than [`MPD_HEADER_SIZE`] bytes are held
    pub fn header(&self) -> Option<MpdHeader> {
        MpdHeader::decode(&self.data)
    }

    /// Bytes following the header
    pub fn payload(&self) -> &[u8] {
        self.data.get(MPD_HEADER_SIZE..).unwrap_or_default()
    }
}

impl fmt::Debug for MpdFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MpdFrame")
            .field("header", &self.header())
            .field("len", &self.data.len())
            .finish()
    }
}

impl FrameAdapter for MpdFrame {
    fn format(&self) -> FrameFormat {
        FrameFormat::Mpd
    }

    /// Never fails: the buffer is resized to fit
    fn load(&mut self, data: &[u8]) -> Result<(), FrameError> {
        self.data.clear();
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn timestamp(&self) -> Timestamp {
        self.header().map_or(0, |h| h.timestamp)
    }

    /// No-op: MPD frames are never split, their timestamp is left as received.
    fn set_first_timestamp(&mut self, _ts: Timestamp) {}

    fn payload_size(&self) -> usize {
        self.data.len()
    }
}

impl_timestamp_ordering!(MpdFrame);
