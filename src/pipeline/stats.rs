//! Aggregate counters for a run.
//!
//! Owned by the single collector thread in [`publish_all`](crate::pipeline::publish_all); workers
//! never touch it, they send [`PublishResult`]s. Because one thread does every mutation, each
//! observation satisfies `completed == success + failed` and `completed <= total`.

use std::time::{Duration, Instant};

use crate::PublishResult;

#[derive(Clone, Debug)]
pub struct AggregateStats {
    total: usize,
    completed: usize,
    success: usize,
    failed: usize,
    lfs_files: usize,
    start: Instant,
}

impl AggregateStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            success: 0,
            failed: 0,
            lfs_files: 0,
            start: Instant::now(),
        }
    }

    /// Count one finished job. Called exactly once per job.
    pub fn record(&mut self, result: &PublishResult) {
        debug_assert!(self.completed < self.total, "more results than jobs");
        self.completed += 1;
        self.lfs_files += result.lfs_files;
        if result.success {
            self.success += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn success(&self) -> usize {
        self.success
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn lfs_files(&self) -> usize {
        self.lfs_files
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Completed jobs per second so far.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.completed as f64 / secs
        } else {
            0.0
        }
    }

    /// Estimated time remaining at the current rate; None until the first job completes.
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.throughput();
        if self.completed == 0 || rate <= 0.0 {
            return None;
        }
        let remaining = (self.total - self.completed) as f64 / rate;
        Some(Duration::from_secs_f64(remaining))
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}
