//! Tile coverage of a bounding box across a zoom range.

use std::collections::BTreeMap;

use super::{
    project, CoordError, GeoBounds, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
};

/// Tiles covering a bounding box for every zoom level of a run.
///
/// Levels are ordered by zoom. The scheme is derived once per run and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingScheme {
    levels: BTreeMap<u8, Vec<TileCoord>>,
    total_tiles: usize,
}

impl TilingScheme {
    /// Tiles at a zoom level (empty if the level is not part of the scheme).
    pub fn tiles_at(&self, zoom: u8) -> &[TileCoord] {
        self.levels.get(&zoom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of tiles at a zoom level.
    pub fn level_count(&self, zoom: u8) -> usize {
        self.tiles_at(zoom).len()
    }

    /// Zoom levels in ascending order.
    pub fn zoom_levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.levels.keys().copied()
    }

    /// Iterate `(zoom, tiles)` in ascending zoom order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[TileCoord])> {
        self.levels.iter().map(|(z, tiles)| (*z, tiles.as_slice()))
    }

    /// Total number of tiles across all levels.
    pub fn total_tiles(&self) -> usize {
        self.total_tiles
    }
}

/// Enumerates the tiles whose footprint overlaps `bounds` at `zoom`.
///
/// The range runs from the tile under the north-west corner
/// (`min_lon`, `max_lat`) to the tile under the south-east corner
/// (`max_lon`, `min_lat`); tile `y` grows southward, so the latitude axis is
/// flipped. Latitudes are clamped into the Web Mercator range and indices into
/// `[0, 2^zoom - 1]`, which keeps the east and south world edges inside the grid.
///
/// Tiles are returned with `x` as the outer loop and `y` as the inner loop.
pub fn tiles_in_bounds(bounds: &GeoBounds, zoom: u8) -> Vec<TileCoord> {
    let max_index = 2.0_f64.powi(zoom as i32) - 1.0;
    let clamp_index = |v: f64| v.floor().clamp(0.0, max_index) as u32;

    let west = bounds.min_lon.clamp(MIN_LON, MAX_LON);
    let east = bounds.max_lon.clamp(MIN_LON, MAX_LON);
    let north = bounds.max_lat.clamp(MIN_LAT, MAX_LAT);
    let south = bounds.min_lat.clamp(MIN_LAT, MAX_LAT);

    let (nw_x, nw_y) = project(west, north, zoom);
    let (se_x, se_y) = project(east, south, zoom);

    let (x0, x1) = (clamp_index(nw_x), clamp_index(se_x));
    let (y0, y1) = (clamp_index(nw_y), clamp_index(se_y));

    let mut tiles = Vec::with_capacity(((x1 - x0 + 1) as usize) * ((y1 - y0 + 1) as usize));
    for x in x0..=x1 {
        for y in y0..=y1 {
            tiles.push(TileCoord { x, y, zoom });
        }
    }
    tiles
}

/// Builds the tiling scheme for `bounds` over `[min_zoom, max_zoom]` inclusive.
pub fn generate_tiling_scheme(
    bounds: &GeoBounds,
    min_zoom: u8,
    max_zoom: u8,
) -> Result<TilingScheme, CoordError> {
    if max_zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(max_zoom));
    }
    if min_zoom > max_zoom {
        return Err(CoordError::InvalidZoomRange {
            min: min_zoom,
            max: max_zoom,
        });
    }

    let mut levels = BTreeMap::new();
    let mut total_tiles = 0;

    for zoom in min_zoom..=max_zoom {
        let tiles = tiles_in_bounds(bounds, zoom);
        total_tiles += tiles.len();
        levels.insert(zoom, tiles);
    }

    Ok(TilingScheme {
        levels,
        total_tiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{bbox_intersects, tile_to_bounds};

    fn world() -> GeoBounds {
        GeoBounds::new(-180.0, -85.0, 180.0, 85.0).unwrap()
    }

    #[test]
    fn test_world_at_zoom_zero_is_single_tile() {
        let tiles = tiles_in_bounds(&world(), 0);
        assert_eq!(tiles, vec![TileCoord::new(0, 0, 0)]);
    }

    #[test]
    fn test_world_at_zoom_one_is_four_tiles() {
        let tiles = tiles_in_bounds(&world(), 1);
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(0, 0, 1),
                TileCoord::new(0, 1, 1),
                TileCoord::new(1, 0, 1),
                TileCoord::new(1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_full_globe_latitudes_are_clamped() {
        let globe = GeoBounds::new(-180.0, -90.0, 180.0, 90.0).unwrap();
        assert_eq!(tiles_in_bounds(&globe, 2).len(), 16);
    }

    #[test]
    fn test_small_box_inside_one_tile() {
        let bounds = GeoBounds::new(10.0, 45.0, 10.5, 45.5).unwrap();
        let tiles = tiles_in_bounds(&bounds, 3);
        assert_eq!(tiles.len(), 1);
        assert!(tile_to_bounds(&tiles[0]).contains(10.25, 45.25));
    }

    #[test]
    fn test_every_tile_intersects_bounds() {
        let bounds = GeoBounds::new(-10.0, -10.0, 10.0, 10.0).unwrap();
        for zoom in 0..=6 {
            for tile in tiles_in_bounds(&bounds, zoom) {
                assert!(bbox_intersects(&tile_to_bounds(&tile), &bounds), "{}", tile);
            }
        }
    }

    #[test]
    fn test_order_is_x_outer_y_inner() {
        let bounds = GeoBounds::new(-10.0, -10.0, 10.0, 10.0).unwrap();
        let tiles = tiles_in_bounds(&bounds, 2);
        let mut sorted = tiles.clone();
        sorted.sort_by_key(|t| (t.x, t.y));
        assert_eq!(tiles, sorted);
    }

    #[test]
    fn test_scheme_counts_accumulate() {
        let bounds = GeoBounds::new(-10.0, -10.0, 10.0, 10.0).unwrap();
        let scheme = generate_tiling_scheme(&bounds, 0, 2).unwrap();

        assert_eq!(scheme.zoom_levels().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(scheme.level_count(0), 1);
        assert_eq!(scheme.level_count(1), 4);
        assert_eq!(
            scheme.total_tiles(),
            scheme.iter().map(|(_, t)| t.len()).sum::<usize>()
        );
        assert!(scheme.level_count(2) >= scheme.level_count(1));
    }

    #[test]
    fn test_scheme_levels_outside_range_are_empty() {
        let scheme = generate_tiling_scheme(&world(), 2, 3).unwrap();
        assert!(scheme.tiles_at(0).is_empty());
        assert_eq!(scheme.level_count(2), 16);
    }

    #[test]
    fn test_scheme_rejects_inverted_zoom_range() {
        let result = generate_tiling_scheme(&world(), 4, 2);
        assert!(matches!(
            result,
            Err(CoordError::InvalidZoomRange { min: 4, max: 2 })
        ));
    }

    #[test]
    fn test_scheme_rejects_excessive_zoom() {
        let result = generate_tiling_scheme(&world(), 0, MAX_ZOOM + 1);
        assert!(matches!(result, Err(CoordError::InvalidZoom(_))));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_level_counts_never_shrink(
                lon in -170.0..160.0_f64,
                lat in -80.0..70.0_f64,
                w in 0.01..10.0_f64,
                h in 0.01..10.0_f64
            ) {
                let bounds = GeoBounds::new(lon, lat, lon + w, lat + h).unwrap();
                let scheme = generate_tiling_scheme(&bounds, 0, 8).unwrap();
                for zoom in 1..=8u8 {
                    prop_assert!(scheme.level_count(zoom) >= scheme.level_count(zoom - 1));
                }
            }
        }
    }
}
