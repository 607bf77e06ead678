//! DEM Tiler CLI - Command-line interface
//!
//! Cuts a digital elevation model into a slippy-map terrain tile pyramid.
//!
//! ```text
//! demtiler init
//! demtiler scheme --bbox -10,-10,10,10 --max-zoom 4
//! demtiler generate dem.asc --output tiles --format quantized-mesh
//! ```

mod commands;
mod error;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use demtiler::config::config_file_path;

use commands::common::load_config;
use commands::generate::GenerateArgs;
use commands::init::InitArgs;
use commands::scheme::SchemeArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "demtiler")]
#[command(version = demtiler::VERSION)]
#[command(about = "Cut a digital elevation model into a terrain tile pyramid", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.demtiler/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate tiles and layer.json from an elevation raster
    Generate(GenerateArgs),
    /// Show how many tiles cover a bounding box at each zoom level
    Scheme(SchemeArgs),
    /// Write a configuration file with default settings
    Init(InitArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate(args) => {
            let file = load_config(cli.config.as_deref())?;
            commands::generate::run(args, file)
        }
        Commands::Scheme(args) => {
            let file = load_config(cli.config.as_deref())?;
            commands::scheme::run(args, file)
        }
        Commands::Init(args) => {
            let path = cli.config.unwrap_or_else(config_file_path);
            commands::init::run(args, &path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "demtiler",
            "generate",
            "dem.asc",
            "--output",
            "tiles",
            "--format",
            "raw-float",
            "--max-zoom",
            "6",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.input, PathBuf::from("dem.asc"));
                assert_eq!(args.max_zoom, Some(6));
                assert_eq!(args.min_zoom, None);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_scheme_negative_bbox() {
        let cli = Cli::try_parse_from([
            "demtiler",
            "--config",
            "/tmp/x.ini",
            "scheme",
            "--bbox",
            "-10,-10,10,10",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.ini")));
        match cli.command {
            Commands::Scheme(args) => assert_eq!(args.bbox, [-10.0, -10.0, 10.0, 10.0]),
            _ => panic!("expected scheme"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from([
            "demtiler", "generate", "dem.asc", "--output", "t", "--format", "jpeg",
        ]);
        assert!(result.is_err());
    }
}
