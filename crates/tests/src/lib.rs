//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - adapter -> frame processor -> latency buffer 全链路
//! - 跨线程读取最后处理的时间戳

#[cfg(test)]
mod reference_buffer {
    use contracts::{FrameAdapter, FrameTimestamp, LatencyBuffer, Timestamp, TimestampKey};

    /// Sorted `Vec` latency buffer used as a test double
    pub struct VecLatencyBuffer<F> {
        frames: Vec<F>,
        capacity: usize,
    }

    impl<F: FrameAdapter + Ord> VecLatencyBuffer<F> {
        pub fn with_capacity(capacity: usize) -> Self {
            Self {
                frames: Vec::with_capacity(capacity),
                capacity,
            }
        }

        pub fn timestamps(&self) -> Vec<Timestamp> {
            self.frames.iter().map(|f| FrameTimestamp.key(f)).collect()
        }
    }

    impl<F: FrameAdapter + Ord> LatencyBuffer<F> for VecLatencyBuffer<F> {
        fn write(&mut self, frame: F) -> bool {
            if self.frames.len() >= self.capacity {
                return false;
            }
            let pos = self.frames.partition_point(|f| f <= &frame);
            self.frames.insert(pos, frame);
            true
        }

        fn occupancy(&self) -> usize {
            self.frames.len()
        }

        fn frames_between(&self, start: Timestamp, end: Timestamp) -> Vec<&F> {
            self.frames
                .iter()
                .filter(|f| (start..=end).contains(&FrameTimestamp.key(*f)))
                .collect()
        }
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{ClockRate, ConfigVersion, FragmentType, FrameFormat, Subsystem};

    #[test]
    fn test_contracts_snapshot() {
        let _ = ConfigVersion::V1;
        assert_eq!(ClockRate::default().hz(), 50_000_000);
        assert_eq!(contracts::DEFAULT_ERROR_THRESHOLD, 1000);
        assert_eq!(
            FrameFormat::ALL.map(|f| f.fragment_type()),
            [FragmentType::Pacman, FragmentType::Mpd, FragmentType::Toad]
        );
        assert!(FrameFormat::ALL
            .iter()
            .all(|f| f.subsystem() == Subsystem::DetectorReadout));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use continuity::{CheckOutcome, FrameProcessor};
    use contracts::{FrameAdapter, FrameError, LatencyBuffer, ReadoutConfig};
    use frame_adapters::{
        AnyFrame, LarpixPacket, MpdHeader, PacmanHeader, PacmanMessageType, PacmanWord, ToadFrame,
        ToadHeader,
    };
    use observability::ContinuityAggregator;
    use rand::seq::SliceRandom;

    use crate::reference_buffer::VecLatencyBuffer;

    const CONFIG: &str = r#"
[clock]
rate_hz = 50000000

[continuity]
error_threshold = 1000

[[streams]]
id = "pacman-0"
format = "pacman"

[[streams]]
id = "mpd-0"
format = "mpd"

[[streams]]
id = "toad-0"
format = "toad"
"#;

    fn config() -> ReadoutConfig {
        ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap()
    }

    fn pacman_message(unix_ts: u32, words: u16) -> Vec<u8> {
        let header = PacmanHeader {
            msg_type: PacmanMessageType::Data,
            unix_ts,
            words,
        };
        let mut out = header.encode().to_vec();
        for i in 0..words {
            let word = PacmanWord {
                word_type: b'D',
                io_channel: 1,
                receipt_timestamp: i as u32,
                packet: LarpixPacket((i as u64) << 16),
            };
            out.extend_from_slice(&word.encode());
        }
        out
    }

    fn mpd_event(ts: u64) -> Vec<u8> {
        let mut out = MpdHeader {
            sync: 0,
            event_length: 4,
            timestamp: ts,
        }
        .encode()
        .to_vec();
        out.extend_from_slice(&[0xAB; 4]);
        out
    }

    /// End-to-end: raw PACMAN bytes -> AnyFrame -> FrameProcessor -> latency buffer
    #[test]
    fn test_pacman_stream_into_buffer() {
        let config = config();
        let stream = config.stream("pacman-0").unwrap();
        let clock = config.effective_clock(stream);
        let mut processor = FrameProcessor::<AnyFrame>::from_config(&config, "pacman-0").unwrap();
        let mut buffer = VecLatencyBuffer::with_capacity(64);

        for secs in 1..=10u32 {
            let frame =
                AnyFrame::from_bytes(stream.format, clock, &pacman_message(secs, 3)).unwrap();
            assert_eq!(processor.process(&frame), CheckOutcome::Continuous);
            assert!(buffer.write(frame));
        }

        assert_eq!(buffer.occupancy(), 10);
        assert_eq!(processor.state().error_count, 0);
        assert_eq!(processor.last_processed().get(), 10 * 50_000_000);

        let window = buffer.frames_between(3 * 50_000_000, 5 * 50_000_000);
        assert_eq!(window.len(), 3);
        assert!(window.iter().all(|f| f.payload_size() == 1_048_576));
    }

    #[test]
    fn test_oversized_pacman_is_dropped_before_processing() {
        let config = config();
        let mut processor = FrameProcessor::<AnyFrame>::from_config(&config, "pacman-0").unwrap();
        let mut frame = AnyFrame::new(contracts::FrameFormat::Pacman, config.clock.rate_hz);

        frame.load(&pacman_message(2, 0)).unwrap();
        processor.process(&frame);

        let err = frame.load(&vec![0u8; 2_000_000]).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidDataSize {
                requested: 2_000_000,
                capacity: 1_048_576
            }
        );
        assert_eq!(frame.timestamp(), 100_000_000);
        assert_eq!(processor.state().frames_checked, 1);
    }

    /// Shuffled MPD events are reordered by the buffer while the monitor counts breaks
    #[test]
    fn test_shuffled_mpd_sorted_by_buffer() {
        let config = config();
        let mut processor = FrameProcessor::<AnyFrame>::from_config(&config, "mpd-0").unwrap();
        let mut buffer = VecLatencyBuffer::with_capacity(500);

        let mut timestamps: Vec<u64> = (1..=500).map(|i| i * 1000).collect();
        timestamps.shuffle(&mut rand::rng());

        let mut breaks = 0;
        let mut previous = 0;
        for &ts in &timestamps {
            let frame = AnyFrame::from_bytes(
                contracts::FrameFormat::Mpd,
                config.clock.rate_hz,
                &mpd_event(ts),
            )
            .unwrap();
            let outcome = processor.process(&frame);
            assert_eq!(outcome.is_break(), ts <= previous);
            if outcome.is_break() {
                breaks += 1;
            }
            previous = ts;
            assert!(buffer.write(frame));
        }

        assert_eq!(processor.state().error_count, breaks);
        let sorted = buffer.timestamps();
        assert!(sorted.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(sorted.len(), 500);
    }

    #[test]
    fn test_toad_out_of_order_is_recorded_only() {
        let config = config();
        let mut processor = FrameProcessor::<ToadFrame>::from_config(&config, "toad-0").unwrap();

        for ts in [100u64, 50, 50, 10, 200, 0] {
            let header = ToadHeader {
                timestamp: ts,
                ..Default::default()
            };
            let frame = ToadFrame::from_bytes(&header.encode()).unwrap();
            assert_eq!(processor.process(&frame), CheckOutcome::Unchecked);
        }

        let state = processor.state();
        assert_eq!(state.error_count, 0);
        assert!(!state.problem_reported);
        assert_eq!(state.current_timestamp, 0);
    }

    #[test]
    fn test_escalation_feeds_aggregator() {
        let config = config();
        let mut processor = FrameProcessor::<AnyFrame>::from_config(&config, "mpd-0").unwrap();
        let mut aggregator = ContinuityAggregator::new();
        let id = processor.stream_id().clone();
        let frame =
            AnyFrame::from_bytes(processor.format(), processor.clock(), &mpd_event(7)).unwrap();

        let escalations = (0..1002)
            .map(|_| processor.process(&frame))
            .filter(|o| *o == CheckOutcome::Escalated)
            .count();
        aggregator.update(&id, processor.format(), processor.state());

        assert_eq!(escalations, 1);
        let summary = aggregator.summary();
        assert_eq!(summary.total_breaks, 1001);
        assert_eq!(summary.degraded_streams, vec![id]);
    }

    /// The scheduler side reads the last processed timestamp from another task
    #[tokio::test]
    async fn test_last_processed_visible_across_tasks() {
        let config = config();
        let mut processor = FrameProcessor::<AnyFrame>::from_config(&config, "mpd-0").unwrap();
        let last = processor.last_processed();
        let (tx, mut rx) = tokio::sync::mpsc::channel::<Vec<u8>>(16);

        let seen_by_task = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&seen_by_task);
        let worker = tokio::spawn(async move {
            let mut frame = AnyFrame::new(processor.format(), processor.clock());
            while let Some(raw) = rx.recv().await {
                frame.load(&raw).unwrap();
                processor.process(&frame);
                seen.fetch_add(1, Ordering::Relaxed);
            }
            processor.state()
        });

        for ts in 1..=100u64 {
            tx.send(mpd_event(ts * 10)).await.unwrap();
        }
        drop(tx);

        let state = worker.await.unwrap();
        assert_eq!(seen_by_task.load(Ordering::Relaxed), 100);
        assert_eq!(last.get(), 1000);
        assert_eq!(state.error_count, 0);
    }
}
