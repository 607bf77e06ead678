//! In-memory tile sink.

use parking_lot::Mutex;

use super::{SinkError, TileSink};
use crate::coord::TileCoord;
use crate::encode::EncodedTile;
use crate::pyramid::PyramidMetadata;

/// Collects tiles and the descriptor in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    tiles: Mutex<Vec<EncodedTile>>,
    metadata: Mutex<Option<PyramidMetadata>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the tiles written so far, in arrival order.
    pub fn tiles(&self) -> Vec<EncodedTile> {
        self.tiles.lock().clone()
    }

    /// Tile at `coord`, if one was written.
    pub fn get(&self, coord: &TileCoord) -> Option<EncodedTile> {
        self.tiles.lock().iter().find(|t| t.coord == *coord).cloned()
    }

    pub fn len(&self) -> usize {
        self.tiles.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.lock().is_empty()
    }

    /// Descriptor passed to [`TileSink::finish`], if the run finished.
    pub fn metadata(&self) -> Option<PyramidMetadata> {
        self.metadata.lock().clone()
    }
}

impl TileSink for MemorySink {
    fn write_tile(&self, tile: &EncodedTile) -> Result<(), SinkError> {
        self.tiles.lock().push(tile.clone());
        Ok(())
    }

    fn finish(&self, metadata: &PyramidMetadata) -> Result<(), SinkError> {
        *self.metadata.lock() = Some(metadata.clone());
        Ok(())
    }
}
