//! Settings structs and defaults.
//!
//! [`PyramidConfig`] is what the generator consumes. [`ConfigFile`] mirrors
//! the sections of `config.ini`; each section struct is plain data.

use std::path::PathBuf;

use crate::encode::TileFormat;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default lowest zoom level.
pub const DEFAULT_MIN_ZOOM: u8 = 0;

/// Default highest zoom level.
pub const DEFAULT_MAX_ZOOM: u8 = 10;

/// Default worker count; 0 means one per logical core.
pub const DEFAULT_THREADS: usize = 0;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "demtiler.log";

/// Parameters of one pyramid run.
///
/// # Example
///
/// ```
/// use demtiler::config::PyramidConfig;
/// use demtiler::encode::TileFormat;
///
/// let config = PyramidConfig::default()
///     .with_zoom_range(2, 8)
///     .with_format(TileFormat::QuantizedMesh)
///     .with_threads(4);
///
/// assert_eq!(config.tile_size, 256);
/// assert_eq!(config.max_zoom, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidConfig {
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Lowest zoom level generated.
    pub min_zoom: u8,
    /// Highest zoom level generated.
    pub max_zoom: u8,
    /// Output encoding.
    pub format: TileFormat,
    /// Worker threads, 0 for one per logical core.
    pub threads: usize,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            format: TileFormat::default(),
            threads: DEFAULT_THREADS,
        }
    }
}

impl PyramidConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Number of zoom levels in the run.
    pub fn level_count(&self) -> usize {
        (self.max_zoom as usize + 1).saturating_sub(self.min_zoom as usize)
    }
}

/// Complete configuration loaded from `config.ini`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// `[tiling]` section
    pub tiling: TilingSettings,
    /// `[generation]` section
    pub generation: GenerationSettings,
    /// `[logging]` section
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Pyramid parameters described by this file.
    pub fn pyramid_config(&self) -> PyramidConfig {
        PyramidConfig {
            tile_size: self.tiling.tile_size,
            min_zoom: self.tiling.min_zoom,
            max_zoom: self.tiling.max_zoom,
            format: self.tiling.format,
            threads: self.generation.threads,
        }
    }
}

/// Tiling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingSettings {
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub format: TileFormat,
}

impl Default for TilingSettings {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            format: TileFormat::default(),
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationSettings {
    pub threads: usize,
}

/// Log file location.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: super::file::config_directory().join("logs"),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
