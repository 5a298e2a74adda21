//! Pool plumbing: job and result channels shared by the dispatcher, the workers and the collector.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::{Job, PublishResult};

/// Pool sizing and display.
#[derive(Clone, Copy, Debug)]
pub struct PoolOpts {
    /// Worker threads (clamped to at least 1 and at most the job count).
    pub workers: usize,
    /// Draw the live progress bar.
    pub show_progress: bool,
}

/// Channels for one run. The job queue is filled once up front and closed; workers exit when it
/// drains. The result channel closes when the last worker drops its sender.
pub struct PoolChannels {
    pub job_tx: Sender<Job>,
    pub job_rx: Receiver<Job>,
    pub result_tx: Sender<PublishResult>,
    pub result_rx: Receiver<PublishResult>,
}

pub fn create_pool_channels(job_count: usize) -> PoolChannels {
    let (job_tx, job_rx) = bounded::<Job>(job_count.max(1));
    let (result_tx, result_rx) = unbounded::<PublishResult>();
    PoolChannels {
        job_tx,
        job_rx,
        result_tx,
        result_rx,
    }
}
