//! Pyramid descriptor (`layer.json`) and its accumulator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coord::{GeoBounds, TileCoord};
use crate::encode::TileFormat;

/// TileJSON version written to the descriptor.
pub const TILEJSON_VERSION: &str = "2.1.0";

/// Projection of the tile grid.
pub const PROJECTION: &str = "EPSG:3857";

/// Inclusive tile-index rectangle of emitted tiles at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRange {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

impl TileRange {
    /// Range covering a single tile.
    pub fn single(coord: &TileCoord) -> Self {
        Self {
            start_x: coord.x,
            start_y: coord.y,
            end_x: coord.x,
            end_y: coord.y,
        }
    }

    /// Grow the range to include `coord`.
    pub fn include(&mut self, coord: &TileCoord) {
        self.start_x = self.start_x.min(coord.x);
        self.start_y = self.start_y.min(coord.y);
        self.end_x = self.end_x.max(coord.x);
        self.end_y = self.end_y.max(coord.y);
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        (self.start_x..=self.end_x).contains(&coord.x)
            && (self.start_y..=self.end_y).contains(&coord.y)
    }
}

/// Descriptor for a finished pyramid.
///
/// Serializes to the TileJSON-style `layer.json` read by terrain clients.
/// `available` has one entry per zoom level from 0 to `maxzoom`; levels
/// without emitted tiles are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidMetadata {
    pub tilejson: String,
    pub format: String,
    pub bounds: [f64; 4],
    pub minzoom: u8,
    pub maxzoom: u8,
    pub projection: String,
    pub tiles: Vec<String>,
    pub available: Vec<Option<TileRange>>,
}

impl PyramidMetadata {
    /// Emitted range at `zoom`, if any tile was emitted there.
    pub fn available_at(&self, zoom: u8) -> Option<&TileRange> {
        self.available.get(zoom as usize).and_then(Option::as_ref)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Builds [`PyramidMetadata`] from emitted tiles.
///
/// The generator folds each level's outcomes in once the level is done, so
/// the accumulator is only ever touched from one thread.
#[derive(Debug, Clone)]
pub struct MetadataAccumulator {
    bounds: GeoBounds,
    min_zoom: u8,
    max_zoom: u8,
    format: TileFormat,
    ranges: BTreeMap<u8, TileRange>,
}

impl MetadataAccumulator {
    pub fn new(bounds: GeoBounds, min_zoom: u8, max_zoom: u8, format: TileFormat) -> Self {
        Self {
            bounds,
            min_zoom,
            max_zoom,
            format,
            ranges: BTreeMap::new(),
        }
    }

    /// Record one emitted tile.
    pub fn record(&mut self, coord: &TileCoord) {
        self.ranges
            .entry(coord.zoom)
            .and_modify(|r| r.include(coord))
            .or_insert_with(|| TileRange::single(coord));
    }

    /// Produce the descriptor.
    pub fn finish(&self) -> PyramidMetadata {
        let available = (0..=self.max_zoom)
            .map(|z| {
                if z < self.min_zoom {
                    None
                } else {
                    self.ranges.get(&z).copied()
                }
            })
            .collect();

        PyramidMetadata {
            tilejson: TILEJSON_VERSION.to_string(),
            format: self.format.descriptor_format().to_string(),
            bounds: self.bounds.as_array(),
            minzoom: self.min_zoom,
            maxzoom: self.max_zoom,
            projection: PROJECTION.to_string(),
            tiles: vec![format!("{{z}}/{{x}}/{{y}}.{}", self.format.extension())],
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulator(format: TileFormat) -> MetadataAccumulator {
        let bounds = GeoBounds::new(-10.0, -10.0, 10.0, 10.0).unwrap();
        MetadataAccumulator::new(bounds, 1, 3, format)
    }

    #[test]
    fn test_range_grows() {
        let mut range = TileRange::single(&TileCoord::new(5, 7, 4));
        range.include(&TileCoord::new(3, 9, 4));
        range.include(&TileCoord::new(4, 8, 4));
        assert_eq!(
            range,
            TileRange {
                start_x: 3,
                start_y: 7,
                end_x: 5,
                end_y: 9
            }
        );
        assert!(range.contains(&TileCoord::new(4, 8, 4)));
        assert!(!range.contains(&TileCoord::new(6, 8, 4)));
    }

    #[test]
    fn test_finish_fills_levels_from_zero() {
        let mut acc = accumulator(TileFormat::HeightmapPng);
        acc.record(&TileCoord::new(0, 0, 1));
        acc.record(&TileCoord::new(1, 1, 1));
        acc.record(&TileCoord::new(3, 3, 3));

        let meta = acc.finish();
        assert_eq!(meta.available.len(), 4);
        assert_eq!(meta.available[0], None);
        assert_eq!(
            meta.available[1],
            Some(TileRange {
                start_x: 0,
                start_y: 0,
                end_x: 1,
                end_y: 1
            })
        );
        // Level 2 had nothing emitted
        assert_eq!(meta.available[2], None);
        assert_eq!(
            meta.available_at(3),
            Some(&TileRange::single(&TileCoord::new(3, 3, 3)))
        );
    }

    #[test]
    fn test_descriptor_fields() {
        let meta = accumulator(TileFormat::HeightmapPng).finish();
        assert_eq!(meta.tilejson, "2.1.0");
        assert_eq!(meta.format, "heightmap-1.0");
        assert_eq!(meta.bounds, [-10.0, -10.0, 10.0, 10.0]);
        assert_eq!(meta.minzoom, 1);
        assert_eq!(meta.maxzoom, 3);
        assert_eq!(meta.projection, "EPSG:3857");
        assert_eq!(meta.tiles, vec!["{z}/{x}/{y}.png".to_string()]);
    }

    #[test]
    fn test_descriptor_follows_format() {
        let meta = accumulator(TileFormat::QuantizedMesh).finish();
        assert_eq!(meta.format, "quantized-mesh-1.0");
        assert_eq!(meta.tiles, vec!["{z}/{x}/{y}.terrain".to_string()]);
    }

    #[test]
    fn test_json_uses_camel_case_ranges() {
        let mut acc = accumulator(TileFormat::RawFloat);
        acc.record(&TileCoord::new(1, 0, 1));
        let json = acc.finish().to_json().unwrap();

        assert!(json.contains("\"startX\": 1"));
        assert!(json.contains("\"endY\": 0"));
        assert!(json.contains("\"tilejson\": \"2.1.0\""));
        assert!(json.contains("null"));

        let parsed = PyramidMetadata::from_json(&json).unwrap();
        assert_eq!(parsed, acc.finish());
    }
}
