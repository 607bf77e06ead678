//! Terminal progress bar for pyramid runs.

use demtiler::coord::TileCoord;
use demtiler::pyramid::{OutcomeKind, ProgressListener};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str = "{msg:>4} [{bar:40.cyan/blue}] {pos}/{len} tiles {elapsed_precise}";

/// Drives an `indicatif` bar, one pass of the bar per zoom level.
///
/// Draws to stdout; log output goes to stderr and the log file.
pub struct LevelProgress {
    bar: ProgressBar,
}

impl LevelProgress {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stdout())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(style);

        Self { bar }
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressListener for LevelProgress {
    fn level_started(&self, zoom: u8, tiles: usize) {
        self.bar.reset();
        self.bar.set_length(tiles as u64);
        self.bar.set_message(format!("z{}", zoom));
    }

    fn tile_finished(&self, _coord: &TileCoord, _kind: OutcomeKind) {
        self.bar.inc(1);
    }

    fn level_finished(&self, zoom: u8) {
        self.bar
            .println(format!("z{:<3} {} tiles", zoom, self.bar.position()));
    }
}
