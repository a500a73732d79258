//! # Continuity
//!
//! 读出链路的逐 stream 时间戳连续性检查。
//!
//! 负责：
//! - 统计有序 stream 中时间戳不递增的跳变
//! - stream 超过阈值后只上报一次完整性错误
//! - 向请求调度方发布最后处理的时间戳
//! - 执行逐 stream 的预处理阶段
//!
//! ## 使用示例
//!
//! ```ignore
//! use continuity::FrameProcessor;
//! use frame_adapters::AnyFrame;
//!
//! let mut processor = FrameProcessor::<AnyFrame>::from_config(&config, "pacman-0")?;
//! let last = processor.last_processed();
//!
//! processor.process(&frame);
//! assert_eq!(last.get(), frame.timestamp());
//! ```

mod monitor;
mod processor;

pub use contracts::{ContinuityHealth, ContinuityState};
pub use monitor::{
    CheckOutcome, ContinuityCounters, ContinuityMonitor, ContinuityPolicy, LastProcessed,
};
pub use processor::{FrameProcessor, PreprocessTask};
