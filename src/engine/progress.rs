//! Progress bar for the publish run.
//!
//! The bar is owned by the collector thread (the only thread that sees results), so it needs no
//! lock. kdam renders percentage, counts, rate and ETA; the postfix carries success/failure/LFS.

use kdam::{Animation, Bar, BarExt};

use crate::pipeline::stats::AggregateStats;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    /// Create a new progress bar configuration
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> Bar {
    kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = " dirs"
    )
}

/// `✓12 ✗1 LFS:3` postfix shown after the bar.
pub fn stats_postfix(stats: &AggregateStats) -> String {
    format!(
        "✓{} ✗{} LFS:{}",
        stats.success(),
        stats.failed(),
        stats.lfs_files()
    )
}

/// Live progress line. Disabled instances swallow every call.
pub struct PublishProgress {
    bar: Option<Bar>,
}

impl PublishProgress {
    pub fn new(total: usize, enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let mut b =
                create_progress_bar(ProgressBarConfig::new(total, "Publishing", Animation::Classic));
            let _ = b.refresh();
            b
        });
        Self { bar }
    }

    /// One job finished.
    pub fn job_done(&mut self, stats: &AggregateStats) {
        if let Some(bar) = self.bar.as_mut() {
            bar.set_postfix(stats_postfix(stats));
            let _ = bar.update(1);
        }
    }

    /// Periodic redraw so elapsed time and rate move even while every worker is busy.
    pub fn tick(&mut self, stats: &AggregateStats) {
        if let Some(bar) = self.bar.as_mut() {
            bar.set_postfix(stats_postfix(stats));
            let _ = bar.refresh();
        }
    }

    /// Final redraw and line break so the summary starts on a clean line.
    pub fn finish(&mut self, stats: &AggregateStats) {
        if self.bar.is_some() {
            self.tick(stats);
            eprintln!();
        }
    }
}
