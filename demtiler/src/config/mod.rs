//! Configuration for pyramid runs.
//!
//! [`PyramidConfig`] is the in-memory configuration the generator consumes.
//! [`ConfigFile`] loads and saves the user's `~/.demtiler/config.ini`:
//!
//! ```ini
//! [tiling]
//! tile_size = 256
//! min_zoom = 0
//! max_zoom = 10
//! format = heightmap-png
//!
//! [generation]
//! threads = 0
//!
//! [logging]
//! directory = ~/.demtiler/logs
//! file = demtiler.log
//! ```

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, GenerationSettings, LoggingSettings, PyramidConfig, TilingSettings,
    DEFAULT_LOG_FILE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_THREADS, DEFAULT_TILE_SIZE,
};
