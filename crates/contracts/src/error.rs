//! Layered error definitions
//!
//! Categorized by source: frame / config

use thiserror::Error;

/// Error raised while populating a frame adapter.
///
/// This is the only recoverable condition on the per-frame path. Every other
/// adapter operation returns a sentinel value instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Source data does not fit into a fixed-capacity adapter.
    ///
    /// The adapter buffer is left exactly as it was before the call.
    #[error("unable to load all data: size of data ({requested}) is greater than frame capacity ({capacity})")]
    InvalidDataSize { requested: usize, capacity: usize },
}

impl FrameError {
    /// Create an oversized load error
    pub fn invalid_data_size(requested: usize, capacity: usize) -> Self {
        Self::InvalidDataSize {
            requested,
            capacity,
        }
    }
}

/// Unified error type for configuration and I/O
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Stream not present in the configuration
    #[error("stream not found: {stream_id}")]
    StreamNotFound { stream_id: String },

    // ===== Frame Errors =====
    /// Frame load error
    #[error(transparent)]
    Frame(#[from] FrameError),

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create stream-not-found error
    pub fn stream_not_found(stream_id: impl Into<String>) -> Self {
        Self::StreamNotFound {
            stream_id: stream_id.into(),
        }
    }
}
