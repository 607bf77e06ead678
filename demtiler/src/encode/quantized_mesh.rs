//! Reduced quantized-mesh terrain tiles.
//!
//! Only the 88-byte header and a grid of quantized heights are written:
//!
//! ```text
//! offset  size  field
//!      0    24  tile centre, ECEF (3 × f64)
//!     24     8  minimum / maximum height (2 × f32)
//!     32    32  bounding sphere centre (3 × f64) and radius (f64)
//!     64    24  horizon occlusion point, ellipsoid-scaled (3 × f64)
//!     88  2·w·h heights, row-major i16
//! ```
//!
//! All values are little-endian. Triangle indices, edge indices, vertex
//! normals and the water mask of the full format are not produced, so these
//! tiles are not readable by clients expecting complete quantized-mesh-1.0.

use crate::coord::GeoBounds;

use super::error::check_dimensions;
use super::{normalize, EncodeContext, EncodeError, TileEncoder, TileFormat};

/// Size of the fixed header in bytes.
pub const QUANTIZED_MESH_HEADER_SIZE: usize = 88;

/// WGS84 semi-major axis in metres.
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 semi-minor axis in metres.
const WGS84_B: f64 = 6_356_752.314_245_179;
/// WGS84 first eccentricity squared.
const WGS84_E2: f64 = 6.694_379_990_141_316e-3;

type Vec3 = [f64; 3];

/// Encode a height grid as a reduced quantized-mesh block.
///
/// Heights are quantized against the tile's own finite min/max to
/// `round(normalized * 32767)`; NaN samples and flat tiles quantize to 0.
pub fn encode_quantized_mesh(
    data: &[f32],
    width: u32,
    height: u32,
    bounds: &GeoBounds,
) -> Result<Vec<u8>, EncodeError> {
    check_dimensions(data, width, height)?;

    let (min_height, max_height) = finite_range(data);
    let header = MeshHeader::compute(bounds, min_height, max_height);

    let mut out = Vec::with_capacity(QUANTIZED_MESH_HEADER_SIZE + data.len() * 2);
    header.write(&mut out);
    for &v in data {
        let q = (normalize(v, min_height, max_height) * 32767.0).round() as i16;
        out.extend_from_slice(&q.to_le_bytes());
    }
    Ok(out)
}

/// Minimum and maximum over finite samples, `(0, 0)` if there are none.
fn finite_range(data: &[f32]) -> (f32, f32) {
    data.iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, &v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })
        .unwrap_or((0.0, 0.0))
}

#[derive(Debug, Clone, PartialEq)]
struct MeshHeader {
    center: Vec3,
    min_height: f32,
    max_height: f32,
    sphere_center: Vec3,
    sphere_radius: f64,
    horizon_occlusion: Vec3,
}

impl MeshHeader {
    fn compute(bounds: &GeoBounds, min_height: f32, max_height: f32) -> Self {
        let (center_lon, center_lat) = bounds.center();
        let mid_height = (min_height as f64 + max_height as f64) / 2.0;
        let center = geodetic_to_ecef(center_lon, center_lat, mid_height);

        let points = sample_points(bounds, min_height as f64, max_height as f64);
        let (sphere_center, sphere_radius) = bounding_sphere(&points);
        let horizon_occlusion = horizon_occlusion_point(&center, &points).unwrap_or([0.0; 3]);

        Self {
            center,
            min_height,
            max_height,
            sphere_center,
            sphere_radius,
            horizon_occlusion,
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        for c in self.center {
            out.extend_from_slice(&c.to_le_bytes());
        }
        out.extend_from_slice(&self.min_height.to_le_bytes());
        out.extend_from_slice(&self.max_height.to_le_bytes());
        for c in self.sphere_center {
            out.extend_from_slice(&c.to_le_bytes());
        }
        out.extend_from_slice(&self.sphere_radius.to_le_bytes());
        for c in self.horizon_occlusion {
            out.extend_from_slice(&c.to_le_bytes());
        }
    }
}

/// Corners and centre of the tile at both its minimum and maximum height.
fn sample_points(bounds: &GeoBounds, min_height: f64, max_height: f64) -> Vec<Vec3> {
    let (center_lon, center_lat) = bounds.center();
    let surface = [
        (bounds.min_lon, bounds.min_lat),
        (bounds.max_lon, bounds.min_lat),
        (bounds.min_lon, bounds.max_lat),
        (bounds.max_lon, bounds.max_lat),
        (center_lon, center_lat),
    ];

    surface
        .iter()
        .flat_map(|&(lon, lat)| {
            [
                geodetic_to_ecef(lon, lat, min_height),
                geodetic_to_ecef(lon, lat, max_height),
            ]
        })
        .collect()
}

/// WGS84 geodetic position to earth-centred, earth-fixed metres.
fn geodetic_to_ecef(lon: f64, lat: f64, height: f64) -> Vec3 {
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    [
        (n + height) * cos_lat * cos_lon,
        (n + height) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + height) * sin_lat,
    ]
}

/// Sphere centred on the points' axis-aligned box, enclosing every point.
fn bounding_sphere(points: &[Vec3]) -> (Vec3, f64) {
    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for p in points {
        for i in 0..3 {
            lo[i] = lo[i].min(p[i]);
            hi[i] = hi[i].max(p[i]);
        }
    }

    let center = [
        (lo[0] + hi[0]) / 2.0,
        (lo[1] + hi[1]) / 2.0,
        (lo[2] + hi[2]) / 2.0,
    ];
    let radius = points
        .iter()
        .map(|p| magnitude(&sub(p, &center)))
        .fold(0.0, f64::max);
    (center, radius)
}

/// Horizon occlusion point in ellipsoid-scaled space.
///
/// The point lies on the ray from the earth's centre through the scaled tile
/// centre, far enough out that whenever it is below the horizon every sample
/// point is too. Returns `None` when some point faces away from that ray by
/// more than the horizon allows, which happens for tiles spanning a large
/// part of the globe.
fn horizon_occlusion_point(center: &Vec3, points: &[Vec3]) -> Option<Vec3> {
    let direction = normalized(&to_scaled_space(center))?;

    let mut max_magnitude = 0.0_f64;
    for p in points {
        let m = occlusion_magnitude(p, &direction)?;
        max_magnitude = max_magnitude.max(m);
    }
    if !max_magnitude.is_finite() || max_magnitude <= 0.0 {
        return None;
    }

    Some(scale(&direction, max_magnitude))
}

fn occlusion_magnitude(point: &Vec3, direction: &Vec3) -> Option<f64> {
    let scaled = to_scaled_space(point);
    let mag = magnitude(&scaled);
    if mag == 0.0 {
        return None;
    }
    let point_dir = scale(&scaled, 1.0 / mag);

    // Points below the ellipsoid surface are treated as on it
    let mag = mag.max(1.0);
    let cos_alpha = dot(&point_dir, direction);
    let sin_alpha = magnitude(&cross(&point_dir, direction));
    let cos_beta = 1.0 / mag;
    let sin_beta = (mag * mag - 1.0).max(0.0).sqrt() * cos_beta;

    let denom = cos_alpha * cos_beta - sin_alpha * sin_beta;
    if denom <= 0.0 {
        return None;
    }
    Some(1.0 / denom)
}

fn to_scaled_space(p: &Vec3) -> Vec3 {
    [p[0] / WGS84_A, p[1] / WGS84_A, p[2] / WGS84_B]
}

fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: &Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn magnitude(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

fn normalized(a: &Vec3) -> Option<Vec3> {
    let m = magnitude(a);
    (m > 0.0).then(|| scale(a, 1.0 / m))
}

/// Quantized-mesh encoder using the tile footprint from the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantizedMeshEncoder;

impl QuantizedMeshEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl TileEncoder for QuantizedMeshEncoder {
    fn encode(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        ctx: &EncodeContext,
    ) -> Result<Vec<u8>, EncodeError> {
        encode_quantized_mesh(data, width, height, &ctx.bounds)
    }

    fn expected_size(&self, width: u32, height: u32) -> Option<usize> {
        Some(QUANTIZED_MESH_HEADER_SIZE + width as usize * height as usize * 2)
    }

    fn format(&self) -> TileFormat {
        TileFormat::QuantizedMesh
    }

    fn name(&self) -> &str {
        "Quantized mesh (heights only)"
    }
}
