//! CLI error handling with user-friendly messages.
//!
//! Every failure a command can hit is mapped into [`CliError`], which knows
//! how to print itself and which exit code to use.

use std::fmt;
use std::io;
use std::process;

use demtiler::config::ConfigFileError;
use demtiler::coord::CoordError;
use demtiler::pyramid::PyramidError;
use demtiler::raster::RasterError;

/// Exit code for runs that finished but left some tiles unwritten.
pub const EXIT_INCOMPLETE: i32 = 2;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(io::Error),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Input raster could not be loaded
    Raster(RasterError),
    /// Bounding box or zoom range rejected
    Scheme(CoordError),
    /// Pyramid run aborted
    Pyramid(PyramidError),
    /// Pyramid run finished with failed tiles
    Incomplete { failed: usize },
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Incomplete { .. } => EXIT_INCOMPLETE,
            _ => 1,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Raster(RasterError::Sidecar { .. }) => {
                eprintln!();
                eprintln!("Image heightmaps need a JSON sidecar next to them, e.g. dem.png.json:");
                eprintln!(
                    r#"  {{"bounds": [min_lon, min_lat, max_lon, max_lat], "scale": 1.0, "offset": 0.0}}"#
                );
            }
            CliError::Incomplete { .. } => {
                eprintln!();
                eprintln!("The failed tiles are listed above and in the log file.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Raster(e) => write!(f, "Failed to load raster: {}", e),
            CliError::Scheme(e) => write!(f, "Invalid tiling request: {}", e),
            CliError::Pyramid(e) => write!(f, "Pyramid generation failed: {}", e),
            CliError::Incomplete { failed } => {
                write!(f, "{} tile(s) could not be written", failed)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Raster(e) => Some(e),
            CliError::Scheme(e) => Some(e),
            CliError::Pyramid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<RasterError> for CliError {
    fn from(e: RasterError) -> Self {
        CliError::Raster(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Scheme(e)
    }
}

impl From<PyramidError> for CliError {
    fn from(e: PyramidError) -> Self {
        CliError::Pyramid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Incomplete { failed: 3 }.exit_code(), EXIT_INCOMPLETE);
        let err: CliError = PyramidError::InvalidConfig("tile size".into()).into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_display() {
        let err = CliError::Incomplete { failed: 3 };
        assert_eq!(err.to_string(), "3 tile(s) could not be written");

        let err: CliError = CoordError::InvalidZoomRange { min: 5, max: 2 }.into();
        assert!(err.to_string().starts_with("Invalid tiling request"));
    }

    #[test]
    fn test_from_pyramid_error_keeps_source() {
        use std::error::Error;

        let err: CliError = PyramidError::InvalidConfig("tile size".into()).into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Pyramid generation failed"));
    }
}
