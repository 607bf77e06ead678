//! Pyramid generator: drives tiling, resampling, encoding, and emission.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::config::PyramidConfig;
use crate::coord::{bbox_intersects, generate_tiling_scheme, tile_to_bounds, TileCoord, MAX_ZOOM};
use crate::encode::{encoder_for, EncodeContext, EncodedTile, TileEncoder};
use crate::raster::ElevationRaster;
use crate::resample::{render_tile, TileWindow};
use crate::sink::TileSink;

use super::{
    FailureStage, LevelSummary, MetadataAccumulator, NoProgress, ProgressListener, PyramidError,
    PyramidReport, TileFailure, TileOutcome,
};

/// Generates a tile pyramid from one elevation raster.
///
/// Zoom levels run in ascending order. Tiles within a level are independent
/// and run in parallel on a dedicated worker pool; the raster is shared by
/// reference. Once a level is complete its outcomes are folded into the
/// descriptor and the report on the calling thread.
///
/// A tile that fails to encode or emit is logged, counted, and skipped; the
/// run carries on. Only invalid configuration, pool start-up, and the final
/// descriptor write abort a run. Tiles emitted before an abort stay where
/// the sink put them.
///
/// # Example
///
/// ```
/// use demtiler::config::PyramidConfig;
/// use demtiler::pyramid::PyramidGenerator;
/// use demtiler::raster::ElevationRaster;
/// use demtiler::sink::MemorySink;
///
/// let raster = ElevationRaster::from_samples(
///     vec![0.0, 10.0, 20.0, 30.0],
///     2,
///     2,
///     [-10.0, -10.0, 10.0, 10.0],
///     None,
/// )
/// .unwrap();
///
/// let generator = PyramidGenerator::new(
///     PyramidConfig::default().with_tile_size(16).with_zoom_range(0, 1),
/// );
/// let sink = MemorySink::new();
/// let report = generator.generate(&raster, &sink).unwrap();
///
/// assert_eq!(report.emitted, 5);
/// ```
pub struct PyramidGenerator {
    config: PyramidConfig,
    encoder: Arc<dyn TileEncoder>,
    progress: Arc<dyn ProgressListener>,
}

impl PyramidGenerator {
    /// Create a generator using the encoder for `config.format`.
    pub fn new(config: PyramidConfig) -> Self {
        Self {
            config,
            encoder: encoder_for(config.format),
            progress: Arc::new(NoProgress),
        }
    }

    /// Replace the encoder.
    ///
    /// The descriptor and tile extensions follow the encoder's format.
    pub fn with_encoder(mut self, encoder: Arc<dyn TileEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Attach a progress listener.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressListener>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PyramidConfig {
        &self.config
    }

    pub fn encoder(&self) -> &dyn TileEncoder {
        self.encoder.as_ref()
    }

    /// Check the configuration without running anything.
    pub fn validate(&self) -> Result<(), PyramidError> {
        let c = &self.config;
        if c.tile_size == 0 {
            return Err(PyramidError::InvalidConfig(
                "tile_size must be positive".to_string(),
            ));
        }
        if c.min_zoom > c.max_zoom {
            return Err(PyramidError::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                c.min_zoom, c.max_zoom
            )));
        }
        if c.max_zoom > MAX_ZOOM {
            return Err(PyramidError::InvalidConfig(format!(
                "max_zoom {} exceeds the maximum of {}",
                c.max_zoom, MAX_ZOOM
            )));
        }
        Ok(())
    }

    /// Run the whole pyramid.
    ///
    /// # Errors
    ///
    /// - [`PyramidError::InvalidConfig`] before any tile work starts
    /// - [`PyramidError::InvalidScheme`] if the raster bounds cannot be tiled
    /// - [`PyramidError::ThreadPool`] if the workers cannot be started
    /// - [`PyramidError::Finalize`] if the sink rejects the descriptor
    pub fn generate(
        &self,
        raster: &ElevationRaster,
        sink: &dyn TileSink,
    ) -> Result<PyramidReport, PyramidError> {
        let started = Instant::now();
        self.validate()?;

        let scheme = generate_tiling_scheme(
            raster.bounds(),
            self.config.min_zoom,
            self.config.max_zoom,
        )?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .thread_name(|i| format!("demtiler-worker-{}", i))
            .build()?;

        info!(
            encoder = self.encoder.name(),
            tile_size = self.config.tile_size,
            min_zoom = self.config.min_zoom,
            max_zoom = self.config.max_zoom,
            tiles = scheme.total_tiles(),
            threads = pool.current_num_threads(),
            "Starting pyramid generation"
        );

        let mut accumulator = MetadataAccumulator::new(
            *raster.bounds(),
            self.config.min_zoom,
            self.config.max_zoom,
            self.encoder.format(),
        );
        let mut levels = Vec::with_capacity(self.config.level_count());
        let mut failures = Vec::new();

        for (zoom, tiles) in scheme.iter() {
            self.progress.level_started(zoom, tiles.len());

            let outcomes: Vec<(TileCoord, TileOutcome)> = pool.install(|| {
                tiles
                    .par_iter()
                    .map(|coord| {
                        let outcome = self.process_tile(raster, coord, sink);
                        self.progress.tile_finished(coord, outcome.kind());
                        (*coord, outcome)
                    })
                    .collect()
            });

            let mut level = LevelSummary::new(zoom, tiles.len());
            for (coord, outcome) in outcomes {
                level.record(outcome.kind());
                match outcome {
                    TileOutcome::Emitted => accumulator.record(&coord),
                    TileOutcome::Skipped => {}
                    TileOutcome::Failed(failure) => failures.push(failure),
                }
            }

            info!(
                zoom,
                tiles = level.tiles,
                emitted = level.emitted,
                skipped = level.skipped,
                failed = level.failed,
                "Zoom level complete"
            );
            self.progress.level_finished(zoom);
            levels.push(level);
        }

        let metadata = accumulator.finish();
        sink.finish(&metadata)?;

        let report = PyramidReport::new(metadata, levels, failures, started.elapsed());
        info!(
            emitted = report.emitted,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Pyramid generation complete"
        );
        Ok(report)
    }

    /// Produce and emit one tile.
    ///
    /// Depends only on the raster and the coordinate, so tiles can run in
    /// any order or be retried individually.
    pub fn process_tile(
        &self,
        raster: &ElevationRaster,
        coord: &TileCoord,
        sink: &dyn TileSink,
    ) -> TileOutcome {
        let bounds = tile_to_bounds(coord);
        if !bbox_intersects(&bounds, raster.bounds()) {
            return TileOutcome::Skipped;
        }

        let tile_size = self.config.tile_size;
        let Some(window) = TileWindow::locate(raster, &bounds, tile_size) else {
            debug!(tile = %coord, "Tile only touches raster edge, skipping");
            return TileOutcome::Skipped;
        };

        let data = render_tile(raster, &window, tile_size);
        let ctx = EncodeContext::new(bounds, raster.min_elevation(), raster.max_elevation());

        let bytes = match self.encoder.encode(&data, tile_size, tile_size, &ctx) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(tile = %coord, error = %e, "Tile encoding failed");
                return TileOutcome::Failed(TileFailure::new(
                    *coord,
                    FailureStage::Encode,
                    e.to_string(),
                ));
            }
        };

        let tile = EncodedTile::new(*coord, self.encoder.format(), bytes);
        if let Err(e) = sink.write_tile(&tile) {
            warn!(tile = %coord, error = %e, "Tile emission failed");
            return TileOutcome::Failed(TileFailure::new(
                *coord,
                FailureStage::Emit,
                e.to_string(),
            ));
        }

        debug!(tile = %coord, bytes = tile.bytes.len(), "Tile emitted");
        TileOutcome::Emitted
    }
}
