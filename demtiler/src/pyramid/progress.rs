//! Progress observation for pyramid runs.

use crate::coord::TileCoord;

use super::OutcomeKind;

/// Observer of a pyramid run.
///
/// `tile_finished` is called from worker threads, concurrently and in no
/// particular order within a level. The level callbacks are called from the
/// thread running [`generate`](super::PyramidGenerator::generate).
pub trait ProgressListener: Send + Sync {
    /// A zoom level with `tiles` candidate tiles is about to start.
    fn level_started(&self, _zoom: u8, _tiles: usize) {}

    /// One tile finished.
    fn tile_finished(&self, _coord: &TileCoord, _kind: OutcomeKind) {}

    /// All tiles of a zoom level are done.
    fn level_finished(&self, _zoom: u8) {}
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressListener for NoProgress {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        tiles: AtomicUsize,
    }

    impl ProgressListener for Counting {
        fn tile_finished(&self, _coord: &TileCoord, _kind: OutcomeKind) {
            self.tiles.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_default_methods_are_no_ops() {
        let listener: &dyn ProgressListener = &NoProgress;
        listener.level_started(0, 1);
        listener.tile_finished(&TileCoord::new(0, 0, 0), OutcomeKind::Emitted);
        listener.level_finished(0);
    }

    #[test]
    fn test_partial_override() {
        let listener = Counting {
            tiles: AtomicUsize::new(0),
        };
        listener.level_started(1, 4);
        listener.tile_finished(&TileCoord::new(0, 0, 1), OutcomeKind::Skipped);
        listener.tile_finished(&TileCoord::new(1, 0, 1), OutcomeKind::Emitted);
        assert_eq!(listener.tiles.load(Ordering::Relaxed), 2);
    }
}
