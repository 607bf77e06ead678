//! Per-tile outcomes and the run report.

use std::fmt;
use std::time::Duration;

use crate::coord::TileCoord;

use super::PyramidMetadata;

/// Pipeline stage a tile failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Encode,
    Emit,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Encode => write!(f, "encode"),
            FailureStage::Emit => write!(f, "emit"),
        }
    }
}

/// A tile that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileFailure {
    pub coord: TileCoord,
    pub stage: FailureStage,
    pub message: String,
}

impl TileFailure {
    pub fn new(coord: TileCoord, stage: FailureStage, message: impl Into<String>) -> Self {
        Self {
            coord,
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for TileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} failed): {}", self.coord, self.stage, self.message)
    }
}

/// What happened to one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileOutcome {
    /// Encoded and handed to the sink.
    Emitted,
    /// Outside raster coverage.
    Skipped,
    /// Encoding or emission failed.
    Failed(TileFailure),
}

impl TileOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            TileOutcome::Emitted => OutcomeKind::Emitted,
            TileOutcome::Skipped => OutcomeKind::Skipped,
            TileOutcome::Failed(_) => OutcomeKind::Failed,
        }
    }
}

/// Outcome without the failure details, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Emitted,
    Skipped,
    Failed,
}

/// Counts for one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub zoom: u8,
    pub tiles: usize,
    pub emitted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl LevelSummary {
    pub fn new(zoom: u8, tiles: usize) -> Self {
        Self {
            zoom,
            tiles,
            emitted: 0,
            skipped: 0,
            failed: 0,
        }
    }

    /// Count one outcome.
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Emitted => self.emitted += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::Failed => self.failed += 1,
        }
    }
}

/// Result of a completed pyramid run.
#[derive(Debug, Clone)]
pub struct PyramidReport {
    /// Descriptor handed to the sink.
    pub metadata: PyramidMetadata,

    /// Tiles encoded and emitted.
    pub emitted: usize,

    /// Tiles outside raster coverage.
    pub skipped: usize,

    /// Tiles that failed to encode or emit.
    pub failed: usize,

    /// Details of every failed tile.
    pub failures: Vec<TileFailure>,

    /// Per-level counts in zoom order.
    pub levels: Vec<LevelSummary>,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl PyramidReport {
    pub fn new(
        metadata: PyramidMetadata,
        levels: Vec<LevelSummary>,
        failures: Vec<TileFailure>,
        elapsed: Duration,
    ) -> Self {
        let emitted = levels.iter().map(|l| l.emitted).sum();
        let skipped = levels.iter().map(|l| l.skipped).sum();
        let failed = levels.iter().map(|l| l.failed).sum();
        Self {
            metadata,
            emitted,
            skipped,
            failed,
            failures,
            levels,
            elapsed,
        }
    }

    /// Tiles considered across all levels.
    pub fn total_tiles(&self) -> usize {
        self.emitted + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for PyramidReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles emitted, {} skipped, {} failed in {:.2}s",
            self.emitted,
            self.skipped,
            self.failed,
            self.elapsed.as_secs_f64()
        )
    }
}
