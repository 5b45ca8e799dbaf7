//! Error handling for clod-select
//!
//! The selection kernel itself cannot fail. Everything here guards the
//! host-facing entry points: window/buffer sizing, configuration and the
//! GPU plumbing around the compute dispatch.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for selection results
pub type LodResult<T> = Result<T, LodError>;

#[derive(Debug, Error)]
pub enum LodError {
    #[error("batch window [{offset}, {offset} + {size}) exceeds input of {len} points")]
    BatchOutOfBounds { offset: u32, size: u32, len: usize },

    #[error("output buffer holds {capacity} points but the pass may append {required}")]
    OutputTooSmall { required: usize, capacity: usize },

    #[error("output slot {slot} reserved past capacity {capacity}")]
    OutputOverflow { slot: u32, capacity: usize },

    #[error("input holds {actual} points, buffers were sized for {expected}")]
    InputLengthMismatch { expected: usize, actual: usize },

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to read configuration file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("{buffer} needs {required} bytes, device allows {limit} per binding")]
    GpuBufferTooLarge {
        buffer: &'static str,
        required: u64,
        limit: u64,
    },

    #[error("GPU operation '{operation}' failed: {error}")]
    GpuOperationFailed { operation: String, error: String },
}

/// Helper trait for attaching an operation label to foreign errors
pub trait LodErrorContext<T> {
    fn lod_context(self, operation: &str) -> LodResult<T>;
}

impl<T, E> LodErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn lod_context(self, operation: &str) -> LodResult<T> {
        self.map_err(|e| gpu_operation_error(operation, e))
    }
}

/// Create a GPU operation error
pub fn gpu_operation_error(operation: &str, error: impl std::fmt::Display) -> LodError {
    LodError::GpuOperationFailed {
        operation: operation.to_string(),
        error: error.to_string(),
    }
}

/// Create a configuration validation error
pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> LodError {
    LodError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}
