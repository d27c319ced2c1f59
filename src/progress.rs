//! Per-item progress reporting
//!
//! Extractors call [`ProgressReporter::advance`] once per processed item;
//! how that is shown is up to the reporter handed in.

use indicatif::{ProgressBar, ProgressStyle};

pub trait ProgressReporter: Send + Sync {
    /// Called once before the first item with the number of items
    fn start(&self, total: usize);

    /// Called once per processed item
    fn advance(&self, item: &str);

    /// Called after the last item
    fn finish(&self);
}

/// Reporter that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _total: usize) {}
    fn advance(&self, _item: &str) {}
    fn finish(&self) {}
}

/// Terminal progress bar
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, item: &str) {
        self.bar.set_message(item.to_string());
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
