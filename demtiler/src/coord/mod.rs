//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (longitude/latitude),
//! slippy map tile coordinates, and tile footprints, plus enumeration of the
//! tiles that cover a bounding box across a zoom range.

mod scheme;
mod types;

pub use scheme::{generate_tiling_scheme, tiles_in_bounds, TilingScheme};
pub use types::{
    CoordError, GeoBounds, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `zoom` - Zoom level (0 to 24)
///
/// The indices are not clamped: a longitude of exactly 180° lands on
/// `x == 2^zoom`. Use [`tiles_in_bounds`] when a valid tile range is needed.
#[inline]
pub fn lon_lat_to_tile(lon: f64, lat: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let (fx, fy) = project(lon, lat, zoom);

    Ok(TileCoord {
        x: fx.floor() as u32,
        y: fy.floor() as u32,
        zoom,
    })
}

/// Returns the geographic footprint of a tile.
///
/// This is the exact inverse of [`lon_lat_to_tile`]: the tile's north edge is
/// `atan(sinh(π(1 - 2y/n)))` and its south edge uses `y + 1`.
#[inline]
pub fn tile_to_bounds(tile: &TileCoord) -> GeoBounds {
    let n = tile.tiles_per_axis() as f64;
    let x = tile.x as f64;
    let y = tile.y as f64;

    GeoBounds {
        min_lon: x / n * 360.0 - 180.0,
        min_lat: tile_row_to_lat(y + 1.0, n),
        max_lon: (x + 1.0) / n * 360.0 - 180.0,
        max_lat: tile_row_to_lat(y, n),
    }
}

/// Axis-aligned overlap test with closed intervals.
///
/// Rectangles that only share an edge or a corner count as intersecting.
#[inline]
pub fn bbox_intersects(a: &GeoBounds, b: &GeoBounds) -> bool {
    a.min_lon <= b.max_lon
        && b.min_lon <= a.max_lon
        && a.min_lat <= b.max_lat
        && b.min_lat <= a.max_lat
}

/// Fractional tile position of a point, `(x, y)`, without validation.
#[inline]
pub(crate) fn project(lon: f64, lat: f64, zoom: u8) -> (f64, f64) {
    let n = 2.0_f64.powi(zoom as i32);
    let fx = (lon + 180.0) / 360.0 * n;

    // ln(tan φ + sec φ) == asinh(tan φ)
    let lat_rad = lat.to_radians();
    let fy = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;

    (fx, fy)
}

#[inline]
fn tile_row_to_lat(row: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * row / n)).sinh().atan().to_degrees()
}
