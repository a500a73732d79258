//! ClockRate - seconds/ticks conversion for the global clock domain

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Tick rate observed on the reference near-detector deployment (50 MHz).
///
/// Only used as a configuration default. Adapters always receive their rate
/// explicitly.
pub const DEFAULT_CLOCK_RATE_HZ: u64 = 50_000_000;

/// Clock frequency of a detector's timing system, in ticks per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockRate(u64);

impl ClockRate {
    /// Create a clock rate from a frequency in Hz.
    #[inline]
    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    /// Frequency in Hz
    #[inline]
    pub const fn hz(self) -> u64 {
        self.0
    }

    /// Convert whole seconds into ticks.
    ///
    /// Exact for every `u32` seconds value as long as the rate fits in 32 bits.
    /// Saturates instead of wrapping for larger rates.
    #[inline]
    pub const fn seconds_to_ticks(self, seconds: u32) -> Timestamp {
        (seconds as u64).saturating_mul(self.0)
    }

    /// Convert ticks into (fractional) seconds.
    #[inline]
    pub fn ticks_to_seconds(self, ticks: Timestamp) -> f64 {
        if self.0 == 0 {
            return 0.0;
        }
        ticks as f64 / self.0 as f64
    }

    /// Seconds elapsed within the current `window_secs` long window.
    ///
    /// Used to render large absolute tick values readably in logs.
    pub fn seconds_within_window(self, ticks: Timestamp, window_secs: u64) -> f64 {
        let window_ticks = self.0.saturating_mul(window_secs);
        if window_ticks == 0 {
            return 0.0;
        }
        self.ticks_to_seconds(ticks % window_ticks)
    }
}

impl Default for ClockRate {
    fn default() -> Self {
        Self(DEFAULT_CLOCK_RATE_HZ)
    }
}

impl fmt::Display for ClockRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_ticks_exact() {
        let clock = ClockRate::from_hz(50_000_000);
        assert_eq!(clock.seconds_to_ticks(2), 100_000_000);
        assert_eq!(clock.seconds_to_ticks(0), 0);
        assert_eq!(
            clock.seconds_to_ticks(u32::MAX),
            u32::MAX as u64 * 50_000_000
        );
    }

    #[test]
    fn test_seconds_to_ticks_saturates() {
        let clock = ClockRate::from_hz(u64::MAX);
        assert_eq!(clock.seconds_to_ticks(2), u64::MAX);
    }

    #[test]
    fn test_ticks_to_seconds() {
        let clock = ClockRate::from_hz(62_500_000);
        assert_eq!(clock.ticks_to_seconds(125_000_000), 2.0);
        assert_eq!(ClockRate::from_hz(0).ticks_to_seconds(10), 0.0);
    }

    #[test]
    fn test_seconds_within_window() {
        let clock = ClockRate::from_hz(10);
        // 1000 s window = 10_000 ticks; 10_005 ticks wraps to 0.5 s
        assert_eq!(clock.seconds_within_window(10_005, 1000), 0.5);
        assert_eq!(ClockRate::from_hz(0).seconds_within_window(10, 1000), 0.0);
    }

    #[test]
    fn test_serde_transparent() {
        let clock: ClockRate = serde_json::from_str("62500000").unwrap();
        assert_eq!(clock.hz(), 62_500_000);
        assert_eq!(serde_json::to_string(&clock).unwrap(), "62500000");
    }
}
