//! Error types for pyramid runs.

use thiserror::Error;

use crate::coord::CoordError;
use crate::sink::SinkError;

/// Errors that abort a whole pyramid run.
///
/// Per-tile encode and emit failures are not errors at this level; they are
/// collected in the run report instead.
#[derive(Debug, Error)]
pub enum PyramidError {
    /// The run configuration is unusable.
    #[error("Invalid pyramid configuration: {0}")]
    InvalidConfig(String),

    /// The tiling scheme could not be derived from the raster bounds.
    #[error("Invalid tiling scheme: {0}")]
    InvalidScheme(#[from] CoordError),

    /// The worker pool could not be started.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The descriptor could not be written after all tiles were emitted.
    #[error("Failed to finalize pyramid: {0}")]
    Finalize(#[from] SinkError),
}
