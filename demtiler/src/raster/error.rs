//! Error types for raster loading and validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating an elevation raster.
///
/// All of these are fatal for a run: no tile work starts on a raster that
/// failed to load or validate.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Raster dimensions, bounds, sample count, or elevation range are malformed.
    #[error("invalid raster input: {0}")]
    InvalidInput(String),

    /// Failed to read the raster file.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File was readable but its contents are not a valid raster.
    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// Image decoding failed.
    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Georeferencing sidecar is missing fields or malformed.
    #[error("invalid sidecar {}: {source}", path.display())]
    Sidecar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
