//! Timestamp continuity monitor.
//!
//! Watches the arrival order of one stream's frames. A transition where the
//! new timestamp is not strictly greater than the previous one is counted as a
//! break. Once more than `threshold` breaks have been seen a single integrity
//! error is raised and the stream stays degraded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use contracts::{ContinuityState, FrameAdapter, FrameFormat, StreamId, Timestamp};
use tracing::{debug, error};

/// How a monitor treats out-of-order timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuityPolicy {
    /// Count breaks and escalate past the threshold
    Enforce,
    /// Only record the last timestamp
    RecordOnly,
}

impl ContinuityPolicy {
    pub const fn for_format(format: FrameFormat) -> Self {
        if format.timestamps_monotonic() {
            Self::Enforce
        } else {
            Self::RecordOnly
        }
    }
}

/// Result of checking one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Timestamp strictly increased
    Continuous,
    /// Non-increasing timestamp, counted
    Break,
    /// Break that crossed the threshold and raised the integrity error
    Escalated,
    /// Record-only stream, nothing checked
    Unchecked,
    /// Frame of another format, skipped by the processor
    FormatMismatch,
}

impl CheckOutcome {
    pub fn is_break(self) -> bool {
        matches!(self, Self::Break | Self::Escalated)
    }
}

/// Shared handle to the last processed timestamp of a stream
#[derive(Debug, Clone, Default)]
pub struct LastProcessed(Arc<AtomicU64>);

impl LastProcessed {
    pub fn get(&self) -> Timestamp {
        self.0.load(Ordering::Acquire)
    }

    fn publish(&self, ts: Timestamp) {
        self.0.store(ts, Ordering::Release);
    }
}

/// Monitor counters readable from other threads
#[derive(Debug, Default)]
pub struct ContinuityCounters {
    pub frames_checked: AtomicU64,
    pub error_count: AtomicU64,
    pub problem_reported: AtomicBool,
    previous_timestamp: AtomicU64,
    last_processed: LastProcessed,
}

impl ContinuityCounters {
    pub fn last_processed(&self) -> &LastProcessed {
        &self.last_processed
    }

    pub fn snapshot(&self) -> ContinuityState {
        ContinuityState {
            frames_checked: self.frames_checked.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            problem_reported: self.problem_reported.load(Ordering::Relaxed),
            previous_timestamp: self.previous_timestamp.load(Ordering::Relaxed),
            current_timestamp: self.last_processed.get(),
        }
    }
}

/// Per-stream continuity monitor, owned by a single worker
#[derive(Debug)]
pub struct ContinuityMonitor {
    stream_id: StreamId,
    policy: ContinuityPolicy,
    threshold: u64,
    previous_timestamp: Timestamp,
    /// Starts at 0, so a first frame stamped 0 counts as a break
    current_timestamp: Timestamp,
    counters: Arc<ContinuityCounters>,
}

impl ContinuityMonitor {
    pub fn new(stream_id: StreamId, format: FrameFormat, threshold: u64) -> Self {
        Self::with_policy(stream_id, ContinuityPolicy::for_format(format), threshold)
    }

    pub fn with_policy(stream_id: StreamId, policy: ContinuityPolicy, threshold: u64) -> Self {
        Self {
            stream_id,
            policy,
            threshold,
            previous_timestamp: 0,
            current_timestamp: 0,
            counters: Arc::new(ContinuityCounters::default()),
        }
    }

    pub fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    pub fn policy(&self) -> ContinuityPolicy {
        self.policy
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn previous_timestamp(&self) -> Timestamp {
        self.previous_timestamp
    }

    pub fn current_timestamp(&self) -> Timestamp {
        self.current_timestamp
    }

    pub fn counters(&self) -> Arc<ContinuityCounters> {
        Arc::clone(&self.counters)
    }

    pub fn error_count(&self) -> u64 {
        self.counters.error_count.load(Ordering::Relaxed)
    }

    pub fn problem_reported(&self) -> bool {
        self.counters.problem_reported.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> ContinuityState {
        self.counters.snapshot()
    }

    /// Check one frame against the timestamp of the frame before it.
    pub fn check<F: FrameAdapter + ?Sized>(&mut self, frame: &F) -> CheckOutcome {
        self.previous_timestamp = self.current_timestamp;
        self.current_timestamp = frame.timestamp();
        let current = self.current_timestamp;
        self.counters.frames_checked.fetch_add(1, Ordering::Relaxed);

        let outcome = match self.policy {
            ContinuityPolicy::RecordOnly => CheckOutcome::Unchecked,
            ContinuityPolicy::Enforce => self.enforce(current),
        };

        self.counters
            .previous_timestamp
            .store(self.previous_timestamp, Ordering::Relaxed);
        self.counters.last_processed.publish(current);
        observability::record_last_timestamp(&self.stream_id, current);

        outcome
    }

    fn enforce(&mut self, current: Timestamp) -> CheckOutcome {
        if current > self.previous_timestamp {
            return CheckOutcome::Continuous;
        }

        let errors = self.counters.error_count.fetch_add(1, Ordering::Relaxed) + 1;
        observability::record_continuity_break(&self.stream_id);
        debug!(
            stream_id = %self.stream_id,
            previous = self.previous_timestamp,
            current,
            error_count = errors,
            "timestamp continuity mismatch"
        );

        if errors > self.threshold && !self.problem_reported() {
            self.counters.problem_reported.store(true, Ordering::Relaxed);
            observability::record_continuity_escalation(&self.stream_id);
            error!(
                stream_id = %self.stream_id,
                error_count = errors,
                threshold = self.threshold,
                "timestamp continuity broken"
            );
            return CheckOutcome::Escalated;
        }

        CheckOutcome::Break
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_adapters::{MpdFrame, MpdHeader, ToadFrame, ToadHeader};
    use rand::Rng;

    fn mpd(ts: Timestamp) -> MpdFrame {
        let header = MpdHeader {
            sync: 0,
            event_length: 0,
            timestamp: ts,
        };
        MpdFrame::from_bytes(&header.encode())
    }

    fn toad(ts: Timestamp) -> ToadFrame {
        let header = ToadHeader {
            timestamp: ts,
            ..Default::default()
        };
        ToadFrame::from_bytes(&header.encode()).unwrap()
    }

    #[test]
    fn test_policy_from_format() {
        assert_eq!(
            ContinuityPolicy::for_format(FrameFormat::Pacman),
            ContinuityPolicy::Enforce
        );
        assert_eq!(
            ContinuityPolicy::for_format(FrameFormat::Mpd),
            ContinuityPolicy::Enforce
        );
        assert_eq!(
            ContinuityPolicy::for_format(FrameFormat::Toad),
            ContinuityPolicy::RecordOnly
        );
    }

    #[test]
    fn test_strictly_increasing_has_no_errors() {
        let mut monitor = ContinuityMonitor::new("mpd-0".into(), FrameFormat::Mpd, 1000);
        let mut rng = rand::rng();
        let mut ts = 1u64;

        for _ in 0..5000 {
            ts += rng.random_range(1..1_000_000);
            assert_eq!(monitor.check(&mpd(ts)), CheckOutcome::Continuous);
        }

        let state = monitor.state();
        assert_eq!(state.error_count, 0);
        assert!(!state.problem_reported);
        assert_eq!(state.frames_checked, 5000);
        assert_eq!(state.current_timestamp, ts);
    }

    #[test]
    fn test_equal_timestamp_is_break() {
        let mut monitor = ContinuityMonitor::new("mpd-0".into(), FrameFormat::Mpd, 1000);
        assert_eq!(monitor.check(&mpd(10)), CheckOutcome::Continuous);
        assert_eq!(monitor.check(&mpd(10)), CheckOutcome::Break);
        assert_eq!(monitor.check(&mpd(9)), CheckOutcome::Break);
        assert_eq!(monitor.check(&mpd(11)), CheckOutcome::Continuous);
        assert_eq!(monitor.error_count(), 2);
    }

    #[test]
    fn test_snapshot_tracks_previous_and_current() {
        let mut monitor = ContinuityMonitor::new("mpd-0".into(), FrameFormat::Mpd, 1000);
        let state = monitor.state();
        assert_eq!((state.previous_timestamp, state.current_timestamp), (0, 0));

        monitor.check(&mpd(40));
        let state = monitor.state();
        assert_eq!((state.previous_timestamp, state.current_timestamp), (0, 40));

        assert_eq!(monitor.check(&mpd(25)), CheckOutcome::Break);
        let state = monitor.state();
        assert_eq!((state.previous_timestamp, state.current_timestamp), (40, 25));
        assert_eq!(monitor.previous_timestamp(), 40);
        assert_eq!(monitor.current_timestamp(), 25);

        assert_eq!(monitor.check(&mpd(30)), CheckOutcome::Continuous);
        assert_eq!(monitor.state().previous_timestamp, 25);
    }

    #[test]
    fn test_first_frame_at_zero_counts() {
        let mut monitor = ContinuityMonitor::new("mpd-0".into(), FrameFormat::Mpd, 1000);
        assert_eq!(monitor.check(&mpd(0)), CheckOutcome::Break);
        assert_eq!(monitor.error_count(), 1);
    }

    #[test]
    fn test_escalates_once_past_threshold() {
        let mut monitor = ContinuityMonitor::new("mpd-0".into(), FrameFormat::Mpd, 1000);
        monitor.check(&mpd(5000));

        let mut escalations = 0;
        for i in 1..=1000 {
            let outcome = monitor.check(&mpd(5000));
            assert!(outcome.is_break());
            if outcome == CheckOutcome::Escalated {
                escalations += 1;
            }
            assert!(!monitor.problem_reported(), "escalated early at break {i}");
        }
        assert_eq!(escalations, 0);

        assert_eq!(monitor.check(&mpd(5000)), CheckOutcome::Escalated);
        assert!(monitor.problem_reported());
        assert_eq!(monitor.error_count(), 1001);

        for _ in 0..100 {
            assert_eq!(monitor.check(&mpd(1)), CheckOutcome::Break);
        }
        assert_eq!(monitor.error_count(), 1101);
        assert!(monitor.problem_reported());
    }

    #[test]
    fn test_degraded_is_terminal() {
        let mut monitor = ContinuityMonitor::new("mpd-0".into(), FrameFormat::Mpd, 0);
        assert_eq!(monitor.check(&mpd(0)), CheckOutcome::Escalated);
        for ts in 1..100 {
            assert_eq!(monitor.check(&mpd(ts)), CheckOutcome::Continuous);
        }
        assert!(monitor.problem_reported());
        assert_eq!(monitor.error_count(), 1);
    }

    #[test]
    fn test_record_only_never_counts() {
        let mut monitor = ContinuityMonitor::new("toad-0".into(), FrameFormat::Toad, 0);
        let mut rng = rand::rng();
        let mut last = 0;

        for _ in 0..2000 {
            last = rng.random_range(0..1000);
            assert_eq!(monitor.check(&toad(last)), CheckOutcome::Unchecked);
        }

        let state = monitor.state();
        assert_eq!(state.error_count, 0);
        assert!(!state.problem_reported);
        assert_eq!(state.current_timestamp, last);
        assert_eq!(monitor.current_timestamp(), last);
    }

    #[test]
    fn test_counters_shared_across_threads() {
        let mut monitor = ContinuityMonitor::new("mpd-0".into(), FrameFormat::Mpd, 1000);
        let counters = monitor.counters();

        monitor.check(&mpd(3));
        monitor.check(&mpd(2));

        let reader = std::thread::spawn(move || counters.snapshot());
        let state = reader.join().unwrap();
        assert_eq!(state.frames_checked, 2);
        assert_eq!(state.error_count, 1);
        assert_eq!(state.previous_timestamp, 3);
        assert_eq!(state.current_timestamp, 2);
    }
}
