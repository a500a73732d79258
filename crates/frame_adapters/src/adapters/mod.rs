//! Wire format adapters
//!
//! Each adapter owns a copy of one frame and decodes its header on demand.

#[macro_use]
mod macros;

pub(crate) mod common;
mod mpd;
mod pacman;
mod toad;

pub use mpd::{MpdFrame, MpdHeader, MPD_HEADER_SIZE};
pub use pacman::{
    LarpixPacket, PacmanFrame, PacmanHeader, PacmanMessageType, PacmanWord, PacmanWords,
    PACMAN_FRAME_SIZE, PACMAN_HEADER_SIZE, PACMAN_WORD_SIZE,
};
pub use toad::{ToadFrame, ToadHeader, TOAD_FRAME_SIZE};
