//! TOAD overlay adapter
//!
//! A TOAD frame is a fixed 16-byte record. Its timestamp field can be
//! rewritten in place, and TOAD streams do not guarantee arrival order.

use std::fmt;

use bytes::BufMut;
use contracts::{FragmentType, FrameAdapter, FrameError, FrameFormat, Subsystem, Timestamp};

use crate::adapters::common::{copy_into_fixed, read_u16_le, read_u64_le};

pub const TOAD_FRAME_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToadHeader {
    pub timestamp: Timestamp,
    /// Front-end card number
    pub fec: u16,
    pub header_parity: u16,
    pub n_samples: u16,
    /// Samples that failed the parity check
    pub n_bad_parity: u16,
}

impl ToadHeader {
    pub fn decode(buf: &[u8]) -> Option<Self> {
        Some(Self {
            timestamp: read_u64_le(buf, 0)?,
            fec: read_u16_le(buf, 8)?,
            header_parity: read_u16_le(buf, 10)?,
            n_samples: read_u16_le(buf, 12)?,
            n_bad_parity: read_u16_le(buf, 14)?,
        })
    }

    pub fn encode(&self) -> [u8; TOAD_FRAME_SIZE] {
        let mut out = [0u8; TOAD_FRAME_SIZE];
        let mut buf = &mut out[..];
        buf.put_u64_le(self.timestamp);
        buf.put_u16_le(self.fec);
        buf.put_u16_le(self.header_parity);
        buf.put_u16_le(self.n_samples);
        buf.put_u16_le(self.n_bad_parity);
        out
    }
}

/// TOAD overlay adapter (fixed 16-byte buffer)
#[derive(Clone, Copy, Default)]
pub struct ToadFrame {
    data: [u8; TOAD_FRAME_SIZE],
}

impl ToadFrame {
    pub const CAPACITY: usize = TOAD_FRAME_SIZE;
    pub const SUBSYSTEM: Subsystem = FrameFormat::Toad.subsystem();
    pub const FRAGMENT_TYPE: FragmentType = FrameFormat::Toad.fragment_type();
    pub const EXPECTED_TICK_DIFFERENCE: u64 = FrameFormat::Toad.expected_tick_difference();

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, FrameError> {
        let mut frame = Self::new();
        frame.load(data)?;
        Ok(frame)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn header(&self) -> ToadHeader {
        ToadHeader::decode(&self.data).unwrap_or_default()
    }
}

impl fmt::Debug for ToadFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ToadFrame").field(&self.header()).finish()
    }
}

impl FrameAdapter for ToadFrame {
    fn format(&self) -> FrameFormat {
        FrameFormat::Toad
    }

    fn load(&mut self, data: &[u8]) -> Result<(), FrameError> {
        copy_into_fixed(&mut self.data, data)
    }

    fn timestamp(&self) -> Timestamp {
        read_u64_le(&self.data, 0).unwrap_or(0)
    }

    fn set_first_timestamp(&mut self, ts: Timestamp) {
        let mut field = &mut self.data[..8];
        field.put_u64_le(ts);
    }

    fn payload_size(&self) -> usize {
        TOAD_FRAME_SIZE
    }
}

impl_timestamp_ordering!(ToadFrame);
