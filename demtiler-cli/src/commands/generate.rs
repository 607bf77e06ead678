//! Generate command - cut an elevation raster into a tile pyramid.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use demtiler::config::{ConfigFile, PyramidConfig};
use demtiler::logging::init_logging;
use demtiler::pyramid::{PyramidGenerator, PyramidReport};
use demtiler::raster::{self, ImageHeightmapSource, RasterSource};
use demtiler::sink::DirectorySink;
use tracing::info;

use super::common::FormatArg;
use crate::error::CliError;
use crate::progress::LevelProgress;

/// Failures printed to the terminal; the rest are only in the log.
const MAX_LISTED_FAILURES: usize = 20;

/// Arguments for `demtiler generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Input raster: an ESRI ASCII grid (.asc) or a heightmap image with a
    /// <file>.json sidecar
    pub input: PathBuf,

    /// Output directory for tiles and layer.json
    #[arg(short, long)]
    pub output: PathBuf,

    /// Tile encoding (overrides config)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Tile edge length in pixels (overrides config)
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Lowest zoom level to generate (overrides config)
    #[arg(long)]
    pub min_zoom: Option<u8>,

    /// Highest zoom level to generate (overrides config)
    #[arg(long)]
    pub max_zoom: Option<u8>,

    /// Worker threads, 0 for all cores (overrides config)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Georeferencing sidecar for image inputs (default: <input>.json)
    #[arg(long)]
    pub sidecar: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub quiet: bool,
}

impl GenerateArgs {
    /// Merge CLI flags over the configuration file.
    pub fn resolve(&self, file: &ConfigFile) -> PyramidConfig {
        let base = file.pyramid_config();
        PyramidConfig {
            tile_size: self.tile_size.unwrap_or(base.tile_size),
            min_zoom: self.min_zoom.unwrap_or(base.min_zoom),
            max_zoom: self.max_zoom.unwrap_or(base.max_zoom),
            format: self.format.map(Into::into).unwrap_or(base.format),
            threads: self.threads.unwrap_or(base.threads),
        }
    }
}

/// Run the generate command.
pub fn run(args: GenerateArgs, file: ConfigFile) -> Result<(), CliError> {
    let _logging = init_logging(&file.logging.directory, &file.logging.file)
        .map_err(CliError::LoggingInit)?;

    let config = args.resolve(&file);
    let generator = PyramidGenerator::new(config);
    generator.validate()?;

    let source: Box<dyn RasterSource> = match &args.sidecar {
        Some(sidecar) => Box::new(ImageHeightmapSource::new(&args.input).with_sidecar(sidecar)),
        None => raster::open(&args.input),
    };
    info!(source = %source.describe(), "Loading raster");
    let raster = source.load()?;

    println!("Input:   {}", args.input.display());
    println!(
        "Raster:  {}x{} px, elevation {:.1} to {:.1} m",
        raster.width(),
        raster.height(),
        raster.min_elevation(),
        raster.max_elevation()
    );
    println!("Output:  {}", args.output.display());
    println!(
        "Tiles:   {} {}px, zoom {}-{}",
        config.format, config.tile_size, config.min_zoom, config.max_zoom
    );
    println!();

    let sink = DirectorySink::new(&args.output);
    let report = if args.quiet {
        generator.generate(&raster, &sink)?
    } else {
        let progress = Arc::new(LevelProgress::new());
        let result = generator
            .with_progress(progress.clone())
            .generate(&raster, &sink);
        progress.finish();
        result?
    };

    print_report(&report);

    if report.has_failures() {
        return Err(CliError::Incomplete {
            failed: report.failed,
        });
    }
    Ok(())
}

fn print_report(report: &PyramidReport) {
    println!("{:>5} {:>8} {:>8} {:>8}", "zoom", "emitted", "skipped", "failed");
    for level in &report.levels {
        println!(
            "{:>5} {:>8} {:>8} {:>8}",
            level.zoom, level.emitted, level.skipped, level.failed
        );
    }
    println!();

    for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
        println!("  failed: {}", failure);
    }
    if report.failures.len() > MAX_LISTED_FAILURES {
        println!(
            "  ... and {} more",
            report.failures.len() - MAX_LISTED_FAILURES
        );
    }

    println!("{}", report);
}
