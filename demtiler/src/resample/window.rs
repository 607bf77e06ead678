//! Mapping tile footprints onto raster pixel windows.

use crate::coord::GeoBounds;
use crate::raster::ElevationRaster;

use super::{extract_region, resample_elevation};

/// Rectangle of pixels, in raster or tile pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelWindow {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Where a tile's overlap with the raster comes from and where it lands.
///
/// `source` is the window of raster pixels covering the overlap; `dest` is
/// the sub-rectangle of the `tile_size × tile_size` output the overlap
/// occupies. For tiles fully inside the raster `dest` is the whole tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    pub source: PixelWindow,
    pub dest: PixelWindow,
}

impl TileWindow {
    /// Locate the raster window for a tile footprint.
    ///
    /// Returns `None` when the footprint and the raster only touch along an
    /// edge or a corner, leaving no area to sample. Both windows are at least
    /// one pixel in each direction and always lie inside their buffers.
    ///
    /// Positions inside the tile are interpolated linearly in longitude and
    /// latitude, not in Web Mercator. Tile edges match the EPSG:3857 grid, but
    /// rows in between sit at their linear-latitude position, which drifts
    /// from the Mercator row by up to a few pixels on tiles spanning high
    /// latitudes at low zoom.
    pub fn locate(
        raster: &ElevationRaster,
        tile_bounds: &GeoBounds,
        tile_size: u32,
    ) -> Option<TileWindow> {
        let overlap = raster.bounds().intersection(tile_bounds)?;
        if overlap.width() <= 0.0 || overlap.height() <= 0.0 {
            return None;
        }

        let rb = raster.bounds();
        let px = raster.pixel_width_deg();
        let py = raster.pixel_height_deg();

        let (sx0, sx1) = source_span(
            (overlap.min_lon - rb.min_lon) / px,
            (overlap.max_lon - rb.min_lon) / px,
            raster.width(),
        );
        // Raster rows run north to south
        let (sy0, sy1) = source_span(
            (rb.max_lat - overlap.max_lat) / py,
            (rb.max_lat - overlap.min_lat) / py,
            raster.height(),
        );

        let ts = tile_size as f64;
        let (dx0, dx1) = dest_span(
            (overlap.min_lon - tile_bounds.min_lon) / tile_bounds.width() * ts,
            (overlap.max_lon - tile_bounds.min_lon) / tile_bounds.width() * ts,
            tile_size,
        );
        let (dy0, dy1) = dest_span(
            (tile_bounds.max_lat - overlap.max_lat) / tile_bounds.height() * ts,
            (tile_bounds.max_lat - overlap.min_lat) / tile_bounds.height() * ts,
            tile_size,
        );

        Some(TileWindow {
            source: PixelWindow::new(sx0, sy0, sx1 - sx0, sy1 - sy0),
            dest: PixelWindow::new(dx0, dy0, dx1 - dx0, dy1 - dy0),
        })
    }

    /// Returns true if the overlap fills the entire tile.
    pub fn covers_tile(&self, tile_size: u32) -> bool {
        self.dest == PixelWindow::new(0, 0, tile_size, tile_size)
    }
}

/// Floor/ceil a fractional pixel span and clamp it into `[0, limit]`.
fn source_span(start: f64, end: f64, limit: u32) -> (u32, u32) {
    let lo = start.floor().clamp(0.0, (limit - 1) as f64) as u32;
    let hi = (end.ceil().clamp(0.0, limit as f64) as u32).max(lo + 1);
    (lo, hi)
}

/// Round a fractional pixel span and clamp it into `[0, limit]`.
fn dest_span(start: f64, end: f64, limit: u32) -> (u32, u32) {
    let lo = start.round().clamp(0.0, (limit - 1) as f64) as u32;
    let hi = (end.round().clamp(0.0, limit as f64) as u32).max(lo + 1);
    (lo, hi)
}

/// Produce the `tile_size × tile_size` elevation buffer for a located tile.
///
/// The source window is extracted, no-data samples are replaced by the
/// raster's minimum elevation, and the result is resampled into the
/// destination window. Pixels outside the destination window hold the
/// minimum elevation as well.
pub fn render_tile(raster: &ElevationRaster, window: &TileWindow, tile_size: u32) -> Vec<f32> {
    let fill = raster.min_elevation();
    let src = window.source;
    let dst = window.dest;

    let mut region = extract_region(
        raster.data(),
        raster.width(),
        src.x,
        src.y,
        src.width,
        src.height,
    );
    for v in region.iter_mut() {
        if !raster.is_valid(*v) {
            *v = fill;
        }
    }

    let resampled = resample_elevation(&region, src.width, src.height, dst.width, dst.height);
    if window.covers_tile(tile_size) {
        return resampled;
    }

    let ts = tile_size as usize;
    let dw = dst.width as usize;
    let mut tile = vec![fill; ts * ts];
    for (row, chunk) in resampled.chunks_exact(dw).enumerate() {
        let start = (dst.y as usize + row) * ts + dst.x as usize;
        tile[start..start + dw].copy_from_slice(chunk);
    }
    tile
}
