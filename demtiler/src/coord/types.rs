//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Supported zoom range. 2^24 tiles per axis still fits in a `u32` index.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 24;

/// Tile coordinates in the Web Mercator / slippy map quadtree.
///
/// At zoom `z` the world is split into `2^z × 2^z` tiles. `x` grows
/// eastward from the antimeridian, `y` grows southward from the north edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// X coordinate (east-west), 0 at west
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Create a tile coordinate.
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Number of tiles along one axis at this tile's zoom level.
    #[inline]
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.zoom
    }

    /// Returns the tile one level up that contains this tile.
    ///
    /// Zoom 0 has no parent.
    pub fn parent(&self) -> Option<TileCoord> {
        if self.zoom == 0 {
            return None;
        }
        Some(TileCoord {
            x: self.x / 2,
            y: self.y / 2,
            zoom: self.zoom - 1,
        })
    }

    /// Returns the four tiles one level down that subdivide this tile.
    ///
    /// Order: north-west, north-east, south-west, south-east.
    pub fn children(&self) -> [TileCoord; 4] {
        let x = self.x * 2;
        let y = self.y * 2;
        let zoom = self.zoom + 1;
        [
            TileCoord { x, y, zoom },
            TileCoord { x: x + 1, y, zoom },
            TileCoord { x, y: y + 1, zoom },
            TileCoord {
                x: x + 1,
                y: y + 1,
                zoom,
            },
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Axis-aligned geographic rectangle in degrees.
///
/// Used both for tile footprints and for the source raster's extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    /// Create validated bounds.
    ///
    /// All corners must be finite and strictly ordered. A box whose
    /// `min_lon` is east of its `max_lon` (antimeridian crossing) is rejected.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, CoordError> {
        let corners = [min_lon, min_lat, max_lon, max_lat];
        if corners.iter().any(|v| !v.is_finite()) || min_lon >= max_lon || min_lat >= max_lat {
            return Err(CoordError::InvalidBounds(corners));
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    /// Create bounds from a `[minLon, minLat, maxLon, maxLat]` array.
    pub fn from_array(bbox: [f64; 4]) -> Result<Self, CoordError> {
        Self::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }

    /// Returns `[minLon, minLat, maxLon, maxLat]`.
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Centre point as `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Returns true if the point lies inside or on the edge of the bounds.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Overlapping rectangle of two bounds, if they intersect.
    ///
    /// Edge-touching bounds produce a zero-width (or zero-height) result.
    pub fn intersection(&self, other: &GeoBounds) -> Option<GeoBounds> {
        if !super::bbox_intersects(self, other) {
            return None;
        }
        Some(GeoBounds {
            min_lon: self.min_lon.max(other.min_lon),
            min_lat: self.min_lat.max(other.min_lat),
            max_lon: self.max_lon.min(other.max_lon),
            max_lat: self.max_lat.min(other.max_lat),
        })
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-85.05112878 to 85.05112878)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range (0 to 24)
    InvalidZoom(u8),
    /// Zoom range has min above max
    InvalidZoomRange { min: u8, max: u8 },
    /// Bounding box is unordered, empty, or not finite
    InvalidBounds([f64; 4]),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::InvalidZoomRange { min, max } => {
                write!(f, "Invalid zoom range: min {} is above max {}", min, max)
            }
            CoordError::InvalidBounds(b) => {
                write!(
                    f,
                    "Invalid bounds [{}, {}, {}, {}]: corners must be finite with min < max \
                     (antimeridian-crossing boxes are not supported)",
                    b[0], b[1], b[2], b[3]
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
