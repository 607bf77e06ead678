//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::ValueEnum;
use demtiler::config::ConfigFile;
use demtiler::encode::TileFormat;

use crate::error::CliError;

/// Tile format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// 16-bit grayscale PNG normalized to the raster's elevation range
    HeightmapPng,
    /// Little-endian f32 samples, row-major
    RawFloat,
    /// Reduced quantized-mesh: 88-byte header plus i16 heights
    QuantizedMesh,
}

impl From<FormatArg> for TileFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::HeightmapPng => TileFormat::HeightmapPng,
            FormatArg::RawFloat => TileFormat::RawFloat,
            FormatArg::QuantizedMesh => TileFormat::QuantizedMesh,
        }
    }
}

/// Load the configuration file, from `path` when given.
///
/// A missing file yields the defaults; a malformed one is an error.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Parse a `min_lon,min_lat,max_lon,max_lat` bounding box.
pub fn parse_bbox(s: &str) -> Result<[f64; 4], String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected 4 comma-separated values, got {}", v.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_arg_conversion() {
        assert_eq!(TileFormat::from(FormatArg::HeightmapPng), TileFormat::HeightmapPng);
        assert_eq!(TileFormat::from(FormatArg::RawFloat), TileFormat::RawFloat);
        assert_eq!(TileFormat::from(FormatArg::QuantizedMesh), TileFormat::QuantizedMesh);
    }

    #[test]
    fn test_format_arg_names_match_config_tags() {
        for arg in FormatArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(name, TileFormat::from(*arg).tag());
        }
    }

    #[test]
    fn test_parse_bbox() {
        assert_eq!(parse_bbox("-10,-10,10,10"), Ok([-10.0, -10.0, 10.0, 10.0]));
        assert_eq!(parse_bbox(" 5.5, 45 ,6,46"), Ok([5.5, 45.0, 6.0, 46.0]));
    }

    #[test]
    fn test_parse_bbox_errors() {
        assert!(parse_bbox("1,2,3").unwrap_err().contains("got 3"));
        assert!(parse_bbox("1,2,x,4").unwrap_err().contains("'x'"));
    }

    #[test]
    fn test_load_config_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("nope.ini"))).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_config_invalid_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[tiling]\ntile_size = huge\n").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::Config(_))
        ));
    }
}
