//! Tile encoding abstractions.
//!
//! The [`TileEncoder`] trait turns a resampled `width × height` elevation
//! buffer into the bytes of one tile. The pyramid generator holds an
//! `Arc<dyn TileEncoder>` and never depends on a concrete format.
//!
//! ```text
//!   PyramidGenerator ──► Arc<dyn TileEncoder>
//!                               │
//!            ┌──────────────────┼───────────────────┐
//!            ▼                  ▼                   ▼
//!  HeightmapPngEncoder   RawFloatEncoder   QuantizedMeshEncoder
//! ```
//!
//! # Example
//!
//! ```
//! use demtiler::encode::{encoder_for, TileFormat};
//!
//! let encoder = encoder_for(TileFormat::RawFloat);
//! assert_eq!(encoder.extension(), "bin");
//! assert_eq!(encoder.expected_size(256, 256), Some(256 * 256 * 4));
//! ```

mod error;
mod heightmap_png;
mod quantized_mesh;
mod raw;

pub use error::EncodeError;
pub use heightmap_png::{encode_heightmap_png, HeightmapPngEncoder};
pub use quantized_mesh::{encode_quantized_mesh, QuantizedMeshEncoder, QUANTIZED_MESH_HEADER_SIZE};
pub use raw::{encode_raw_heightmap, RawFloatEncoder};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::coord::{GeoBounds, TileCoord};

/// Output format of a tile pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileFormat {
    /// 16-bit grayscale PNG normalized to the raster's elevation range.
    #[default]
    HeightmapPng,
    /// Little-endian `f32` samples, no header.
    RawFloat,
    /// Reduced quantized-mesh block (header plus quantized heights).
    QuantizedMesh,
}

impl TileFormat {
    /// All formats, in tag order.
    pub const ALL: [TileFormat; 3] = [
        TileFormat::HeightmapPng,
        TileFormat::RawFloat,
        TileFormat::QuantizedMesh,
    ];

    /// Short tag used in configuration and on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            TileFormat::HeightmapPng => "heightmap-png",
            TileFormat::RawFloat => "raw-float",
            TileFormat::QuantizedMesh => "quantized-mesh",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::HeightmapPng => "png",
            TileFormat::RawFloat => "bin",
            TileFormat::QuantizedMesh => "terrain",
        }
    }

    /// Value of the descriptor's `format` field.
    pub fn descriptor_format(&self) -> &'static str {
        match self {
            TileFormat::HeightmapPng | TileFormat::RawFloat => "heightmap-1.0",
            TileFormat::QuantizedMesh => "quantized-mesh-1.0",
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TileFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TileFormat::ALL
            .into_iter()
            .find(|f| f.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| EncodeError::UnknownFormat(s.to_string()))
    }
}

/// Per-tile information an encoder may need besides the samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeContext {
    /// Geographic footprint of the tile.
    pub bounds: GeoBounds,
    /// Raster-wide minimum elevation.
    pub min_elevation: f32,
    /// Raster-wide maximum elevation.
    pub max_elevation: f32,
}

impl EncodeContext {
    pub fn new(bounds: GeoBounds, min_elevation: f32, max_elevation: f32) -> Self {
        Self {
            bounds,
            min_elevation,
            max_elevation,
        }
    }
}

/// Trait for encoding elevation buffers into tile bytes.
///
/// Implementations must be thread-safe: one encoder is shared by every
/// worker of a pyramid run.
pub trait TileEncoder: Send + Sync {
    /// Encode a row-major `width × height` buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the buffer does not match the dimensions
    /// or the underlying codec fails.
    fn encode(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        ctx: &EncodeContext,
    ) -> Result<Vec<u8>, EncodeError>;

    /// Exact output size for the given dimensions, if it is known upfront.
    ///
    /// Compressed formats return `None`.
    fn expected_size(&self, _width: u32, _height: u32) -> Option<usize> {
        None
    }

    /// Format produced by this encoder.
    fn format(&self) -> TileFormat;

    /// File extension without the leading dot.
    fn extension(&self) -> &str {
        self.format().extension()
    }

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// Create the encoder for a format.
pub fn encoder_for(format: TileFormat) -> Arc<dyn TileEncoder> {
    match format {
        TileFormat::HeightmapPng => Arc::new(HeightmapPngEncoder::new()),
        TileFormat::RawFloat => Arc::new(RawFloatEncoder::new()),
        TileFormat::QuantizedMesh => Arc::new(QuantizedMeshEncoder::new()),
    }
}

/// One encoded tile on its way to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTile {
    pub coord: TileCoord,
    pub format: TileFormat,
    pub bytes: Vec<u8>,
}

impl EncodedTile {
    pub fn new(coord: TileCoord, format: TileFormat, bytes: Vec<u8>) -> Self {
        Self {
            coord,
            format,
            bytes,
        }
    }

    /// Path relative to the pyramid root, `z/x/y.ext`.
    pub fn relative_path(&self) -> String {
        format!(
            "{}/{}/{}.{}",
            self.coord.zoom,
            self.coord.x,
            self.coord.y,
            self.format.extension()
        )
    }
}

/// Map `v` into `[0, 1]` against `[min, max]`.
///
/// Degenerate ranges, NaN bounds, and NaN samples give 0.
pub(crate) fn normalize(v: f32, min: f32, max: f32) -> f64 {
    let (v, min, max) = (v as f64, min as f64, max as f64);
    if v.is_nan() || min.is_nan() || max.is_nan() || max <= min {
        return 0.0;
    }
    ((v - min) / (max - min)).clamp(0.0, 1.0)
}
