//! # Contracts
//!
//! Frozen interface contracts shared by the readout crates.
//! Business crates depend on this crate only, never on each other in reverse.
//!
//! ## Time Model
//! - Every stored or queried timestamp is a `u64` tick count in one global clock domain
//! - Formats that carry seconds convert them with a configured [`ClockRate`]

mod clock;
mod continuity;
mod error;
mod frame;
mod latency_buffer;
mod readout_config;
mod stream_id;

pub use clock::{ClockRate, DEFAULT_CLOCK_RATE_HZ};
pub use continuity::{ContinuityHealth, ContinuityState};
pub use error::*;
pub use frame::*;
pub use latency_buffer::{FrameTimestamp, LatencyBuffer, TimestampKey};
pub use readout_config::*;
pub use stream_id::StreamId;
