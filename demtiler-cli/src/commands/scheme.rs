//! Scheme command - preview which tiles cover a bounding box.

use std::fmt::Write;

use clap::Args;
use demtiler::config::ConfigFile;
use demtiler::coord::{generate_tiling_scheme, GeoBounds, TilingScheme};

use super::common::parse_bbox;
use crate::error::CliError;

/// Arguments for `demtiler scheme`.
#[derive(Debug, Args)]
pub struct SchemeArgs {
    /// Bounding box as min_lon,min_lat,max_lon,max_lat
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: [f64; 4],

    /// Lowest zoom level (overrides config)
    #[arg(long)]
    pub min_zoom: Option<u8>,

    /// Highest zoom level (overrides config)
    #[arg(long)]
    pub max_zoom: Option<u8>,
}

/// Run the scheme command.
pub fn run(args: SchemeArgs, file: ConfigFile) -> Result<(), CliError> {
    let bounds = GeoBounds::from_array(args.bbox)?;
    let min_zoom = args.min_zoom.unwrap_or(file.tiling.min_zoom);
    let max_zoom = args.max_zoom.unwrap_or(file.tiling.max_zoom);

    let scheme = generate_tiling_scheme(&bounds, min_zoom, max_zoom)?;
    print!("{}", format_scheme(&scheme));
    Ok(())
}

/// Per-level tile counts and x/y ranges, one line per level plus a total.
fn format_scheme(scheme: &TilingScheme) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5} {:>10}  {:<13} {:<13}", "zoom", "tiles", "x", "y");

    for (zoom, tiles) in scheme.iter() {
        let x_range = tiles.iter().map(|t| t.x).min().zip(tiles.iter().map(|t| t.x).max());
        let y_range = tiles.iter().map(|t| t.y).min().zip(tiles.iter().map(|t| t.y).max());
        let (x, y) = match (x_range, y_range) {
            (Some((x0, x1)), Some((y0, y1))) => {
                (format!("{}-{}", x0, x1), format!("{}-{}", y0, y1))
            }
            _ => ("-".to_string(), "-".to_string()),
        };
        let _ = writeln!(out, "{:>5} {:>10}  {:<13} {:<13}", zoom, tiles.len(), x, y);
    }

    let _ = writeln!(out, "{:>5} {:>10}", "total", scheme.total_tiles());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reference_bbox() {
        let bounds = GeoBounds::new(-10.0, -10.0, 10.0, 10.0).unwrap();
        let scheme = generate_tiling_scheme(&bounds, 0, 2).unwrap();
        let text = format_scheme(&scheme);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].trim_start().starts_with("0 "));
        assert!(lines[3].contains("1-2"));
        assert!(lines[4].trim_start().starts_with("total"));
        assert!(lines[4].trim_end().ends_with('9'));
    }

    #[test]
    fn test_run_rejects_inverted_zoom_range() {
        let args = SchemeArgs {
            bbox: [-10.0, -10.0, 10.0, 10.0],
            min_zoom: Some(5),
            max_zoom: Some(2),
        };
        assert!(matches!(
            run(args, ConfigFile::default()),
            Err(CliError::Scheme(_))
        ));
    }

    #[test]
    fn test_run_rejects_bad_bbox() {
        let args = SchemeArgs {
            bbox: [10.0, -10.0, -10.0, 10.0],
            min_zoom: None,
            max_zoom: None,
        };
        assert!(matches!(
            run(args, ConfigFile::default()),
            Err(CliError::Scheme(_))
        ));
    }
}
