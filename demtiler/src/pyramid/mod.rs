//! Pyramid orchestration.
//!
//! [`PyramidGenerator`] walks the tiling scheme level by level:
//!
//! ```text
//! for each zoom level (ascending):
//!     for each tile (parallel):
//!         bounds → intersects raster? ──no──► Skipped
//!            │ yes
//!            ▼
//!         locate window → render → encode → sink.write_tile ──► Emitted | Failed
//!     fold outcomes into MetadataAccumulator and LevelSummary
//! sink.finish(descriptor) ──► PyramidReport
//! ```

mod error;
mod generator;
mod metadata;
mod progress;
mod report;

pub use error::PyramidError;
pub use generator::PyramidGenerator;
pub use metadata::{MetadataAccumulator, PyramidMetadata, TileRange, PROJECTION, TILEJSON_VERSION};
pub use progress::{NoProgress, ProgressListener};
pub use report::{
    FailureStage, LevelSummary, OutcomeKind, PyramidReport, TileFailure, TileOutcome,
};
