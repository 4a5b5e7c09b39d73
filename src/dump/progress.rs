//! Progress tracking for dump operations.
//!
//! Displays a progress bar with document throughput during long-running
//! dumps. The bar length comes from the store's total-match hint, which
//! is informational only; the pipeline never uses it for termination.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress tracker for dump operations.
pub struct DumpProgress {
    processed: AtomicU64,
    start_time: Instant,
    bar: Option<ProgressBar>,
}

impl DumpProgress {
    /// Create a new tracker.
    ///
    /// # Arguments
    /// * `total` - Expected document count if known (None for a spinner)
    /// * `enable_bar` - Whether to display a progress bar at all
    pub fn new(total: Option<u64>, enable_bar: bool) -> Self {
        let bar = if enable_bar {
            let pb = match total {
                Some(n) => {
                    let bar = ProgressBar::new(n);
                    bar.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                            .unwrap()
                            .progress_chars("#>-"),
                    );
                    bar
                }
                None => {
                    let bar = ProgressBar::new_spinner();
                    bar.set_style(
                        ProgressStyle::default_spinner()
                            .template("{spinner:.green} {pos} documents {msg}")
                            .unwrap(),
                    );
                    bar
                }
            };
            Some(pb)
        } else {
            None
        };

        Self {
            processed: AtomicU64::new(0),
            start_time: Instant::now(),
            bar,
        }
    }

    /// Update with the total number of documents processed so far.
    pub fn update(&self, count: u64) {
        self.processed.store(count, Ordering::Relaxed);

        if let Some(ref bar) = self.bar {
            bar.set_position(count);

            let elapsed = self.start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                let speed = count as f64 / elapsed;
                bar.set_message(format!("({speed:.0} docs/sec)"));
            }
        }
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
