//! ESRI ASCII grid reader.
//!
//! The format is a short `key value` header followed by whitespace-separated
//! samples, north row first:
//!
//! ```text
//! ncols         4
//! nrows         3
//! xllcorner     -10.0
//! yllcorner     -10.0
//! cellsize      5.0
//! NODATA_value  -9999
//! 12 13 14 15
//! ...
//! ```
//!
//! `xllcenter`/`yllcenter` and separate `dx`/`dy` cell sizes are accepted as
//! well. Coordinates are taken to be geographic degrees.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ElevationRaster, RasterError, RasterSource};

/// Raster source reading an ESRI ASCII grid file.
#[derive(Debug, Clone)]
pub struct AsciiGridSource {
    path: PathBuf,
}

impl AsciiGridSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RasterSource for AsciiGridSource {
    fn load(&self) -> Result<ElevationRaster, RasterError> {
        let text = fs::read_to_string(&self.path).map_err(|source| RasterError::Read {
            path: self.path.clone(),
            source,
        })?;

        let raster = parse_ascii_grid(&text, &self.path)?;
        debug!(
            path = %self.path.display(),
            width = raster.width(),
            height = raster.height(),
            min_elevation = raster.min_elevation(),
            max_elevation = raster.max_elevation(),
            "Loaded ASCII grid"
        );
        Ok(raster)
    }

    fn describe(&self) -> String {
        format!("ESRI ASCII grid {}", self.path.display())
    }
}

#[derive(Debug, Default)]
struct GridHeader {
    ncols: Option<u32>,
    nrows: Option<u32>,
    xll: Option<(f64, bool)>,
    yll: Option<(f64, bool)>,
    cellsize: Option<f64>,
    dx: Option<f64>,
    dy: Option<f64>,
    no_data: Option<f32>,
}

/// Parse the text of an ESRI ASCII grid.
///
/// `path` is only used for error messages.
pub fn parse_ascii_grid(text: &str, path: &Path) -> Result<ElevationRaster, RasterError> {
    let parse_err = |reason: String| RasterError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let mut header = GridHeader::default();
    let mut lines = text.lines().peekable();

    while let Some(&line) = lines.peek() {
        let mut parts = line.split_whitespace();
        let Some(key) = parts.next() else {
            lines.next();
            continue;
        };
        if !key.starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }
        let value = parts
            .next()
            .ok_or_else(|| parse_err(format!("header key '{}' has no value", key)))?;

        let number = |v: &str| -> Result<f64, RasterError> {
            v.parse::<f64>()
                .map_err(|_| parse_err(format!("header '{}' has invalid value '{}'", key, v)))
        };
        let count = |v: &str| -> Result<u32, RasterError> {
            match v.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(parse_err(format!(
                    "header '{}' must be a positive integer, got '{}'",
                    key, v
                ))),
            }
        };

        match key.to_ascii_lowercase().as_str() {
            "ncols" => header.ncols = Some(count(value)?),
            "nrows" => header.nrows = Some(count(value)?),
            "xllcorner" => header.xll = Some((number(value)?, false)),
            "xllcenter" => header.xll = Some((number(value)?, true)),
            "yllcorner" => header.yll = Some((number(value)?, false)),
            "yllcenter" => header.yll = Some((number(value)?, true)),
            "cellsize" => header.cellsize = Some(number(value)?),
            "dx" => header.dx = Some(number(value)?),
            "dy" => header.dy = Some(number(value)?),
            "nodata_value" => header.no_data = Some(number(value)? as f32),
            other => return Err(parse_err(format!("unknown header key '{}'", other))),
        }
        lines.next();
    }

    let ncols = header.ncols.ok_or_else(|| parse_err("missing ncols".to_string()))?;
    let nrows = header.nrows.ok_or_else(|| parse_err("missing nrows".to_string()))?;
    let (xll, x_is_center) = header
        .xll
        .ok_or_else(|| parse_err("missing xllcorner".to_string()))?;
    let (yll, y_is_center) = header
        .yll
        .ok_or_else(|| parse_err("missing yllcorner".to_string()))?;
    let dx = header
        .dx
        .or(header.cellsize)
        .ok_or_else(|| parse_err("missing cellsize".to_string()))?;
    let dy = header.dy.or(header.cellsize).unwrap_or(dx);

    if dx <= 0.0 || dy <= 0.0 {
        return Err(parse_err(format!(
            "cell size must be positive, got {}×{}",
            dx, dy
        )));
    }

    let min_lon = if x_is_center { xll - dx / 2.0 } else { xll };
    let min_lat = if y_is_center { yll - dy / 2.0 } else { yll };

    // Sized by the samples actually present, never by the header
    let mut data = Vec::new();
    for token in lines.flat_map(str::split_whitespace) {
        let v: f32 = token
            .parse()
            .map_err(|_| parse_err(format!("invalid sample '{}'", token)))?;
        data.push(v);
    }

    let bbox = [
        min_lon,
        min_lat,
        min_lon + ncols as f64 * dx,
        min_lat + nrows as f64 * dy,
    ];

    ElevationRaster::from_samples(data, ncols, nrows, bbox, header.no_data)
}
