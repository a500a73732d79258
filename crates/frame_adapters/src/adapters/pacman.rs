//! PACMAN message adapter
//!
//! A PACMAN message is an 8-byte header followed by `words` 16-byte message
//! words, each carrying one 64-bit LArPix packet. Messages are received into a
//! fixed 1 MiB buffer. The message timestamp is the header's UNIX seconds
//! field, converted to ticks with the stream's configured clock rate.

use std::fmt;

use bytes::BufMut;
use contracts::{
    ClockRate, FragmentType, FrameAdapter, FrameError, FrameFormat, Subsystem, Timestamp,
};
use tracing::debug;

use crate::adapters::common::{copy_into_fixed, read_u16_le, read_u32_le, read_u64_le, read_u8};

/// Fixed receive buffer size
pub const PACMAN_FRAME_SIZE: usize = 1024 * 1024;

/// Message header size
pub const PACMAN_HEADER_SIZE: usize = 8;

/// Size of one message word
pub const PACMAN_WORD_SIZE: usize = 16;

/// PACMAN message type (first header byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacmanMessageType {
    Data,
    Request,
    Reply,
    Unknown(u8),
}

impl PacmanMessageType {
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b'D' => Self::Data,
            b'?' => Self::Request,
            b'!' => Self::Reply,
            other => Self::Unknown(other),
        }
    }

    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Data => b'D',
            Self::Request => b'?',
            Self::Reply => b'!',
            Self::Unknown(other) => other,
        }
    }
}

/// Decoded message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacmanHeader {
    pub msg_type: PacmanMessageType,
    /// Message creation time, UNIX seconds
    pub unix_ts: u32,
    /// Number of message words following the header
    pub words: u16,
}

impl PacmanHeader {
    /// Decode a header from the front of `buf`
    pub fn decode(buf: &[u8]) -> Option<Self> {
        Some(Self {
            msg_type: PacmanMessageType::from_byte(read_u8(buf, 0)?),
            unix_ts: read_u32_le(buf, 1)?,
            words: read_u16_le(buf, 6)?,
        })
    }

    pub fn encode(&self) -> [u8; PACMAN_HEADER_SIZE] {
        let mut out = [0u8; PACMAN_HEADER_SIZE];
        let mut buf = &mut out[..];
        buf.put_u8(self.msg_type.as_byte());
        buf.put_u32_le(self.unix_ts);
        buf.put_u8(0);
        buf.put_u16_le(self.words);
        out
    }
}

/// 64-bit LArPix data packet
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LarpixPacket(pub u64);

impl LarpixPacket {
    #[inline]
    fn bits(self, lo: u32, width: u32) -> u64 {
        (self.0 >> lo) & ((1u64 << width) - 1)
    }

    /// Packet type (0 = data)
    pub fn packet_type(self) -> u8 {
        self.bits(0, 2) as u8
    }

    pub fn chip_id(self) -> u8 {
        self.bits(2, 8) as u8
    }

    pub fn channel_id(self) -> u8 {
        self.bits(10, 6) as u8
    }

    /// Chip-local 31-bit timestamp
    pub fn timestamp(self) -> u32 {
        self.bits(16, 31) as u32
    }

    pub fn first_packet(self) -> bool {
        self.bits(47, 1) == 1
    }

    /// ADC value
    pub fn dataword(self) -> u8 {
        self.bits(48, 8) as u8
    }

    pub fn parity(self) -> bool {
        self.bits(63, 1) == 1
    }
}

impl fmt::Debug for LarpixPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LarpixPacket")
            .field("packet_type", &self.packet_type())
            .field("chip_id", &self.chip_id())
            .field("channel_id", &self.channel_id())
            .field("timestamp", &self.timestamp())
            .field("dataword", &self.dataword())
            .finish()
    }
}

/// Decoded message word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacmanWord {
    pub word_type: u8,
    /// PACMAN I/O channel the packet arrived on
    pub io_channel: u8,
    /// PACMAN receipt time of the packet
    pub receipt_timestamp: u32,
    pub packet: LarpixPacket,
}

impl PacmanWord {
    pub fn decode(buf: &[u8]) -> Option<Self> {
        Some(Self {
            word_type: read_u8(buf, 0)?,
            io_channel: read_u8(buf, 1)?,
            receipt_timestamp: read_u32_le(buf, 4)?,
            packet: LarpixPacket(read_u64_le(buf, 8)?),
        })
    }

    pub fn encode(&self) -> [u8; PACMAN_WORD_SIZE] {
        let mut out = [0u8; PACMAN_WORD_SIZE];
        let mut buf = &mut out[..];
        buf.put_u8(self.word_type);
        buf.put_u8(self.io_channel);
        buf.put_u16_le(0);
        buf.put_u32_le(self.receipt_timestamp);
        buf.put_u64_le(self.packet.0);
        out
    }
}

/// Iterator over the message words actually present in the buffer
pub struct PacmanWords<'a> {
    data: &'a [u8],
    index: usize,
    count: usize,
}

impl Iterator for PacmanWords<'_> {
    type Item = PacmanWord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let offset = PACMAN_HEADER_SIZE + self.index * PACMAN_WORD_SIZE;
        let word = PacmanWord::decode(self.data.get(offset..offset + PACMAN_WORD_SIZE)?)?;
        self.index += 1;
        Some(word)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

/// PACMAN message adapter (fixed 1 MiB buffer)
pub struct PacmanFrame {
    data: Vec<u8>,
    clock: ClockRate,
}

impl PacmanFrame {
    pub const CAPACITY: usize = PACMAN_FRAME_SIZE;
    pub const SUBSYSTEM: Subsystem = FrameFormat::Pacman.subsystem();
    pub const FRAGMENT_TYPE: FragmentType = FrameFormat::Pacman.fragment_type();
    pub const EXPECTED_TICK_DIFFERENCE: u64 = FrameFormat::Pacman.expected_tick_difference();

    /// Create a zero-filled adapter converting seconds with `clock`
    pub fn new(clock: ClockRate) -> Self {
        Self {
            data: vec![0; PACMAN_FRAME_SIZE],
            clock,
        }
    }

    /// Create an adapter and load `data` into it
    pub fn from_bytes(data: &[u8], clock: ClockRate) -> Result<Self, FrameError> {
        let mut frame = Self::new(clock);
        frame.load(data)?;
        Ok(frame)
    }

    pub fn clock(&self) -> ClockRate {
        self.clock
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn header(&self) -> Option<PacmanHeader> {
        PacmanHeader::decode(&self.data)
    }

    pub fn message_type(&self) -> Option<PacmanMessageType> {
        self.header().map(|h| h.msg_type)
    }

    /// Message words, bounded by the header count and the buffer length
    pub fn words(&self) -> PacmanWords<'_> {
        let declared = self.header().map_or(0, |h| h.words as usize);
        let available = self.data.len().saturating_sub(PACMAN_HEADER_SIZE) / PACMAN_WORD_SIZE;
        PacmanWords {
            data: &self.data,
            index: 0,
            count: declared.min(available),
        }
    }

    /// Dump the header and every message word at debug level
    pub fn inspect(&self) {
        let Some(header) = self.header() else {
            debug!("pacman message too short to inspect");
            return;
        };

        debug!(
            timestamp = self.timestamp(),
            msg_type = %char::from(header.msg_type.as_byte()),
            words = header.words,
            "inspecting pacman message"
        );

        for (i, word) in self.words().enumerate() {
            debug!(
                word = i,
                word_type = %char::from(word.word_type),
                io_channel = word.io_channel,
                receipt_timestamp = word.receipt_timestamp,
                packet_type = word.packet.packet_type(),
                chip_id = word.packet.chip_id(),
                channel_id = word.packet.channel_id(),
                packet_timestamp = word.packet.timestamp(),
                "pacman message word"
            );
        }
    }
}

impl fmt::Debug for PacmanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacmanFrame")
            .field("header", &self.header())
            .field("timestamp", &self.timestamp())
            .field("clock", &self.clock)
            .finish()
    }
}

impl FrameAdapter for PacmanFrame {
    fn format(&self) -> FrameFormat {
        FrameFormat::Pacman
    }

    fn load(&mut self, data: &[u8]) -> Result<(), FrameError> {
        copy_into_fixed(&mut self.data, data)
    }

    /// Message UNIX timestamp in ticks, not the individual packet timestamps
    fn timestamp(&self) -> Timestamp {
        self.header()
            .map_or(0, |h| self.clock.seconds_to_ticks(h.unix_ts))
    }

    /// No-op: the header only carries whole seconds, rewriting it is reserved
    /// for frame splitting support.
    fn set_first_timestamp(&mut self, _ts: Timestamp) {}

    fn payload_size(&self) -> usize {
        self.data.len()
    }
}

impl_timestamp_ordering!(PacmanFrame);
