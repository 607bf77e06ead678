//! Destinations for encoded tiles.
//!
//! The pyramid generator hands every encoded tile to a [`TileSink`] and
//! calls [`TileSink::finish`] once with the descriptor after the last level.
//! Sinks are shared by all workers, so implementations must be `Send + Sync`.
//!
//! # Available Sinks
//!
//! - [`DirectorySink`] - writes `{root}/{z}/{x}/{y}.{ext}` and `layer.json`
//! - [`MemorySink`] - keeps tiles in memory, for tests and dry runs

mod directory;
mod error;
mod memory;

pub use directory::{DirectorySink, DESCRIPTOR_FILE};
pub use error::SinkError;
pub use memory::MemorySink;

use crate::encode::EncodedTile;
use crate::pyramid::PyramidMetadata;

/// Receives encoded tiles and the final pyramid descriptor.
pub trait TileSink: Send + Sync {
    /// Persist one tile.
    ///
    /// Called concurrently from worker threads. Tiles are independent, so a
    /// failed write leaves every other tile valid.
    fn write_tile(&self, tile: &EncodedTile) -> Result<(), SinkError>;

    /// Persist the descriptor once all levels are done.
    fn finish(&self, _metadata: &PyramidMetadata) -> Result<(), SinkError> {
        Ok(())
    }
}
