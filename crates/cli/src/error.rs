//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Capture file not found
    #[error("Capture file not found: {path}")]
    CaptureNotFound { path: String },

    /// Malformed capture file
    #[error("Malformed capture at byte {offset}: {message}")]
    CaptureFormat { offset: u64, message: String },

    /// Pipeline execution error
    #[error("Pipeline execution failed: {message}")]
    PipelineExecution { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn capture_not_found(path: &Path) -> Self {
        Self::CaptureNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn capture_format(offset: u64, message: impl Into<String>) -> Self {
        Self::CaptureFormat {
            offset,
            message: message.into(),
        }
    }

    pub fn pipeline_execution(message: impl Into<String>) -> Self {
        Self::PipelineExecution {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
