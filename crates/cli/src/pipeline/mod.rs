//! Replay pipeline module.

mod capture;
mod orchestrator;
mod stats;

#[cfg(test)]
pub use capture::encode_record;
pub use capture::CaptureReader;
pub use orchestrator::{Pipeline, PipelineConfig};
pub use stats::PipelineStats;
