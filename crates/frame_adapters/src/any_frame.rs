//! AnyFrame - format-dispatched adapter
//!
//! Lets configuration-driven code pick the wire format at runtime without
//! boxing. The pipeline holds one `AnyFrame` per record.

use contracts::{ClockRate, FrameAdapter, FrameError, FrameFormat, Timestamp};

use crate::adapters::{MpdFrame, PacmanFrame, ToadFrame};

#[derive(Debug)]
pub enum AnyFrame {
    Pacman(PacmanFrame),
    Mpd(MpdFrame),
    Toad(ToadFrame),
}

impl AnyFrame {
    /// Empty adapter for `format`. `clock` is only used by PACMAN.
    pub fn new(format: FrameFormat, clock: ClockRate) -> Self {
        match format {
            FrameFormat::Pacman => Self::Pacman(PacmanFrame::new(clock)),
            FrameFormat::Mpd => Self::Mpd(MpdFrame::new()),
            FrameFormat::Toad => Self::Toad(ToadFrame::new()),
        }
    }

    pub fn from_bytes(
        format: FrameFormat,
        clock: ClockRate,
        data: &[u8],
    ) -> Result<Self, FrameError> {
        let mut frame = Self::new(format, clock);
        frame.load(data)?;
        Ok(frame)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Pacman(f) => f.as_bytes(),
            Self::Mpd(f) => f.as_bytes(),
            Self::Toad(f) => f.as_bytes(),
        }
    }

    fn inner(&self) -> &dyn FrameAdapter {
        match self {
            Self::Pacman(f) => f,
            Self::Mpd(f) => f,
            Self::Toad(f) => f,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FrameAdapter {
        match self {
            Self::Pacman(f) => f,
            Self::Mpd(f) => f,
            Self::Toad(f) => f,
        }
    }
}

impl From<PacmanFrame> for AnyFrame {
    fn from(frame: PacmanFrame) -> Self {
        Self::Pacman(frame)
    }
}

impl From<MpdFrame> for AnyFrame {
    fn from(frame: MpdFrame) -> Self {
        Self::Mpd(frame)
    }
}

impl From<ToadFrame> for AnyFrame {
    fn from(frame: ToadFrame) -> Self {
        Self::Toad(frame)
    }
}

impl FrameAdapter for AnyFrame {
    fn format(&self) -> FrameFormat {
        self.inner().format()
    }

    fn load(&mut self, data: &[u8]) -> Result<(), FrameError> {
        self.inner_mut().load(data)
    }

    fn timestamp(&self) -> Timestamp {
        self.inner().timestamp()
    }

    fn first_timestamp(&self) -> Timestamp {
        self.inner().first_timestamp()
    }

    fn set_first_timestamp(&mut self, ts: Timestamp) {
        self.inner_mut().set_first_timestamp(ts)
    }

    fn payload_size(&self) -> usize {
        self.inner().payload_size()
    }

    fn frame_size(&self) -> usize {
        self.inner().frame_size()
    }
}

impl_timestamp_ordering!(AnyFrame);
