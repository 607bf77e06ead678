//! Elevation raster model and raster source adapters.
//!
//! The pyramid core only ever sees an [`ElevationRaster`]: a validated,
//! row-major sample buffer with its geographic extent and elevation range.
//! Decoding a file into that shape is the job of a [`RasterSource`].
//!
//! # Available Sources
//!
//! - [`AsciiGridSource`] - ESRI ASCII grid (`.asc`)
//! - [`ImageHeightmapSource`] - grayscale image plus a JSON georeferencing sidecar
//!
//! [`open`] picks a source from the file extension.

mod ascii_grid;
mod error;
mod image_source;

pub use ascii_grid::{parse_ascii_grid, AsciiGridSource};
pub use error::RasterError;
pub use image_source::{HeightmapSidecar, ImageHeightmapSource};

use std::path::Path;

use crate::coord::GeoBounds;

/// Capability for producing an elevation raster.
///
/// Implementations must return either a complete, validated raster or an
/// error; never a partially populated one.
pub trait RasterSource: Send + Sync {
    /// Load and validate the raster.
    fn load(&self) -> Result<ElevationRaster, RasterError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Choose a raster source for `path` by extension.
///
/// `.asc` files are read as ESRI ASCII grids; everything else is decoded as
/// an image with a `<path>.json` sidecar.
pub fn open(path: &Path) -> Box<dyn RasterSource> {
    let is_ascii_grid = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("asc"));

    if is_ascii_grid {
        Box::new(AsciiGridSource::new(path))
    } else {
        Box::new(ImageHeightmapSource::new(path))
    }
}

/// A decoded digital elevation model.
///
/// Samples are row-major, north row first. The raster is read-only once
/// constructed and is shared by reference across tile workers.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationRaster {
    data: Vec<f32>,
    width: u32,
    height: u32,
    bounds: GeoBounds,
    min_elevation: f32,
    max_elevation: f32,
    no_data: Option<f32>,
}

impl ElevationRaster {
    /// Create a raster with an explicit elevation range.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidInput`] when a dimension is zero, the
    /// sample count differs from `width * height`, the bounding box is not
    /// strictly ordered, or the elevation range is not finite and ordered.
    pub fn new(
        data: Vec<f32>,
        width: u32,
        height: u32,
        bbox: [f64; 4],
        min_elevation: f32,
        max_elevation: f32,
        no_data: Option<f32>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidInput(format!(
                "dimensions must be non-zero, got {}×{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(RasterError::InvalidInput(format!(
                "expected {} samples for {}×{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }

        let bounds =
            GeoBounds::from_array(bbox).map_err(|e| RasterError::InvalidInput(e.to_string()))?;

        if !min_elevation.is_finite() || !max_elevation.is_finite() || min_elevation > max_elevation
        {
            return Err(RasterError::InvalidInput(format!(
                "elevation range [{}, {}] must be finite and ordered",
                min_elevation, max_elevation
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            bounds,
            min_elevation,
            max_elevation,
            no_data,
        })
    }

    /// Create a raster, deriving the elevation range from the samples.
    ///
    /// No-data and non-finite samples are excluded from the range.
    pub fn from_samples(
        data: Vec<f32>,
        width: u32,
        height: u32,
        bbox: [f64; 4],
        no_data: Option<f32>,
    ) -> Result<Self, RasterError> {
        let mut range: Option<(f32, f32)> = None;
        for &v in &data {
            if !is_valid_sample(v, no_data) {
                continue;
            }
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }

        let (min_elevation, max_elevation) = range.ok_or_else(|| {
            RasterError::InvalidInput("raster contains no valid elevation samples".to_string())
        })?;

        Self::new(
            data,
            width,
            height,
            bbox,
            min_elevation,
            max_elevation,
            no_data,
        )
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn min_elevation(&self) -> f32 {
        self.min_elevation
    }

    pub fn max_elevation(&self) -> f32 {
        self.max_elevation
    }

    pub fn no_data(&self) -> Option<f32> {
        self.no_data
    }

    /// Degrees of longitude covered by one pixel column.
    pub fn pixel_width_deg(&self) -> f64 {
        self.bounds.width() / self.width as f64
    }

    /// Degrees of latitude covered by one pixel row.
    pub fn pixel_height_deg(&self) -> f64 {
        self.bounds.height() / self.height as f64
    }

    /// Returns true for samples that carry a real measurement.
    #[inline]
    pub fn is_valid(&self, v: f32) -> bool {
        is_valid_sample(v, self.no_data)
    }
}

#[inline]
fn is_valid_sample(v: f32, no_data: Option<f32>) -> bool {
    v.is_finite() && no_data != Some(v)
}
