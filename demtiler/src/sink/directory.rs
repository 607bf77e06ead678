//! Filesystem tile sink.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{SinkError, TileSink};
use crate::encode::EncodedTile;
use crate::pyramid::PyramidMetadata;

/// Name of the descriptor written at the pyramid root.
pub const DESCRIPTOR_FILE: &str = "layer.json";

/// Writes tiles as `{root}/{z}/{x}/{y}.{ext}`.
///
/// Directories are created on demand; concurrent creation of the same
/// directory from several workers is fine.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path a tile is written to.
    pub fn tile_path(&self, tile: &EncodedTile) -> PathBuf {
        self.root.join(tile.relative_path())
    }

    /// Path of the descriptor file.
    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(DESCRIPTOR_FILE)
    }

    fn ensure_dir(path: &Path) -> Result<(), SinkError> {
        fs::create_dir_all(path).map_err(|source| SinkError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file(path: &Path, contents: &[u8]) -> Result<(), SinkError> {
        fs::write(path, contents).map_err(|source| SinkError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl TileSink for DirectorySink {
    fn write_tile(&self, tile: &EncodedTile) -> Result<(), SinkError> {
        let path = self.tile_path(tile);
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }
        Self::write_file(&path, &tile.bytes)?;

        debug!(
            tile = %tile.coord,
            path = %path.display(),
            bytes = tile.bytes.len(),
            "Wrote tile"
        );
        Ok(())
    }

    fn finish(&self, metadata: &PyramidMetadata) -> Result<(), SinkError> {
        Self::ensure_dir(&self.root)?;
        let json = metadata.to_json()?;
        let path = self.descriptor_path();
        Self::write_file(&path, json.as_bytes())?;

        info!(path = %path.display(), "Wrote pyramid descriptor");
        Ok(())
    }
}
