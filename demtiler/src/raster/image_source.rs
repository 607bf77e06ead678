//! Grayscale image heightmaps with a JSON georeferencing sidecar.
//!
//! Any single-channel image the `image` crate can decode (16-bit PNG or TIFF
//! are typical) is read as 16-bit luma. The sidecar supplies what the image
//! cannot carry:
//!
//! ```json
//! { "bounds": [-10.0, -10.0, 10.0, 10.0], "scale": 0.1, "offset": -500.0, "no_data": 0 }
//! ```
//!
//! Elevation is `offset + scale * sample`. `no_data` is a raw sample value.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ElevationRaster, RasterError, RasterSource};

/// Georeferencing and value mapping for an image heightmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightmapSidecar {
    /// `[minLon, minLat, maxLon, maxLat]` in degrees.
    pub bounds: [f64; 4],

    #[serde(default = "default_scale")]
    pub scale: f64,

    #[serde(default)]
    pub offset: f64,

    /// Raw sample value meaning "no measurement".
    #[serde(default)]
    pub no_data: Option<u16>,
}

fn default_scale() -> f64 {
    1.0
}

impl HeightmapSidecar {
    fn elevation(&self, sample: u16) -> f32 {
        (self.offset + self.scale * sample as f64) as f32
    }
}

/// Raster source decoding a grayscale image plus its sidecar.
#[derive(Debug, Clone)]
pub struct ImageHeightmapSource {
    path: PathBuf,
    sidecar: PathBuf,
}

impl ImageHeightmapSource {
    /// Source reading `path` with the sidecar at `<path>.json`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut sidecar = path.clone().into_os_string();
        sidecar.push(".json");
        Self {
            path,
            sidecar: PathBuf::from(sidecar),
        }
    }

    /// Use an explicit sidecar path.
    pub fn with_sidecar(mut self, sidecar: impl Into<PathBuf>) -> Self {
        self.sidecar = sidecar.into();
        self
    }

    fn read_sidecar(&self) -> Result<HeightmapSidecar, RasterError> {
        let text = fs::read_to_string(&self.sidecar).map_err(|source| RasterError::Read {
            path: self.sidecar.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RasterError::Sidecar {
            path: self.sidecar.clone(),
            source,
        })
    }
}

impl RasterSource for ImageHeightmapSource {
    fn load(&self) -> Result<ElevationRaster, RasterError> {
        let sidecar = self.read_sidecar()?;

        let image = image::open(&self.path)
            .map_err(|source| RasterError::Image {
                path: self.path.clone(),
                source,
            })?
            .into_luma16();
        let (width, height) = image.dimensions();

        let data: Vec<f32> = image
            .into_raw()
            .into_iter()
            .map(|s| sidecar.elevation(s))
            .collect();
        let no_data = sidecar.no_data.map(|s| sidecar.elevation(s));

        debug!(
            path = %self.path.display(),
            width,
            height,
            "Decoded image heightmap"
        );

        ElevationRaster::from_samples(data, width, height, sidecar.bounds, no_data)
    }

    fn describe(&self) -> String {
        format!(
            "image heightmap {} (sidecar {})",
            self.path.display(),
            self.sidecar.display()
        )
    }
}
