//! Error types for tile sinks.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while emitting tiles or the descriptor.
#[derive(Debug, Error)]
pub enum SinkError {
    /// A tile directory could not be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tile or descriptor file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor could not be serialized.
    #[error("Failed to serialize descriptor: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = SinkError::Write {
            path: PathBuf::from("/out/1/0/0.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write /out/1/0/0.png: denied");
    }

    #[test]
    fn test_source_is_io_error() {
        use std::error::Error as _;
        let err = SinkError::CreateDirectory {
            path: PathBuf::from("/out/1"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };
        assert!(err.source().is_some());
    }
}
