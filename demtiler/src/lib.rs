//! DEM Tiler - terrain tile pyramids from elevation rasters
//!
//! Converts one digital elevation model into fixed-size terrain tiles
//! addressed by the slippy-map `z/x/y` scheme, for 3D terrain renderers.
//!
//! The pipeline per tile is:
//!
//! 1. [`coord`] - which tiles cover the raster at each zoom level
//! 2. [`resample`] - map a tile footprint onto raster pixels and resample
//! 3. [`encode`] - heightmap PNG, raw float, or reduced quantized-mesh bytes
//! 4. [`sink`] - hand the bytes to a destination
//!
//! [`pyramid`] drives the pipeline across all levels in parallel and builds
//! the `layer.json` descriptor. [`raster`] decodes input files into an
//! [`raster::ElevationRaster`].

pub mod config;
pub mod coord;
pub mod encode;
pub mod logging;
pub mod pyramid;
pub mod raster;
pub mod resample;
pub mod sink;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
