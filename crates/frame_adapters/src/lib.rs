//! # Frame Adapters
//!
//! Decoders for the detector front-end wire formats.
//!
//! Responsibilities:
//! - Own a copy of one raw frame (PACMAN message, MPD event, TOAD overlay)
//! - Extract the canonical timestamp in global clock ticks
//! - Order frames by timestamp for the latency buffer
//! - Tag frames with their subsystem and fragment type
//!
//! ## Usage Example
//!
//! ```
//! use contracts::{ClockRate, FrameAdapter, FrameFormat};
//! use frame_adapters::{AnyFrame, MpdHeader};
//!
//! let raw = MpdHeader { sync: 0, event_length: 0, timestamp: 100 }.encode();
//! let frame = AnyFrame::from_bytes(FrameFormat::Mpd, ClockRate::default(), &raw).unwrap();
//! assert_eq!(frame.timestamp(), 100);
//! ```

#[macro_use]
mod adapters;
mod any_frame;

pub use adapters::{
    LarpixPacket, MpdFrame, MpdHeader, PacmanFrame, PacmanHeader, PacmanMessageType, PacmanWord,
    PacmanWords, ToadFrame, ToadHeader, MPD_HEADER_SIZE, PACMAN_FRAME_SIZE, PACMAN_HEADER_SIZE,
    PACMAN_WORD_SIZE, TOAD_FRAME_SIZE,
};
pub use any_frame::AnyFrame;
pub use contracts::{FrameAdapter, FrameError, FrameFormat, Timestamp};
