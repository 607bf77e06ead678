//! Error types for tile encoding.

use thiserror::Error;

/// Errors that can occur while encoding a tile buffer.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Sample count does not match `width * height`.
    #[error("Dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The image codec rejected the buffer.
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// Format tag not recognised.
    #[error("Unknown tile format '{0}' (expected heightmap-png, raw-float or quantized-mesh)")]
    UnknownFormat(String),
}

/// Check that `data` holds exactly `width * height` samples.
pub(crate) fn check_dimensions(data: &[f32], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize;
    if data.len() != expected {
        return Err(EncodeError::DimensionMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}
