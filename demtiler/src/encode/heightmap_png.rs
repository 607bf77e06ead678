//! 16-bit grayscale PNG heightmaps.

use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, Luma};

use super::error::check_dimensions;
use super::{normalize, EncodeContext, EncodeError, TileEncoder, TileFormat};

/// Encode samples as a single-channel 16-bit PNG.
///
/// Each sample maps to `round(clamp((v - min) / (max - min), 0, 1) * 65535)`.
/// A degenerate range (`max <= min`) and NaN samples map to 0. Output is
/// byte-identical for identical input.
pub fn encode_heightmap_png(
    data: &[f32],
    width: u32,
    height: u32,
    min_elevation: f32,
    max_elevation: f32,
) -> Result<Vec<u8>, EncodeError> {
    check_dimensions(data, width, height)?;

    let samples: Vec<u16> = data
        .iter()
        .map(|&v| (normalize(v, min_elevation, max_elevation) * 65535.0).round() as u16)
        .collect();

    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(width, height, samples).ok_or(EncodeError::DimensionMismatch {
            expected: width as usize * height as usize,
            actual: data.len(),
        })?;

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// PNG heightmap encoder normalized against the raster-wide elevation range.
///
/// Using the raster range rather than each tile's own keeps neighbouring
/// tiles comparable.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightmapPngEncoder;

impl HeightmapPngEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl TileEncoder for HeightmapPngEncoder {
    fn encode(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        ctx: &EncodeContext,
    ) -> Result<Vec<u8>, EncodeError> {
        encode_heightmap_png(data, width, height, ctx.min_elevation, ctx.max_elevation)
    }

    fn format(&self) -> TileFormat {
        TileFormat::HeightmapPng
    }

    fn name(&self) -> &str {
        "PNG heightmap (16-bit)"
    }
}
