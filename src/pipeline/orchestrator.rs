use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::progress::PublishProgress;
use crate::pipeline::context::{PoolOpts, create_pool_channels};
use crate::pipeline::stats::AggregateStats;
use crate::publish::{PublishContext, publish_dir};
use crate::utils::config::ProgressConsts;
use crate::utils::fd_limit::effective_workers;
use crate::{Job, PublishResult};

/// Everything a run produced: one result per job (completion order) and the final counters.
pub struct Report {
    pub results: Vec<PublishResult>,
    pub stats: AggregateStats,
}

impl Report {
    pub fn failures(&self) -> impl Iterator<Item = &PublishResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Single worker: take jobs until the queue closes, publish each, send the result.
fn worker_loop(job_rx: Receiver<Job>, result_tx: Sender<PublishResult>, ctx: Arc<PublishContext>) {
    while let Ok(job) = job_rx.recv() {
        let result = publish_dir(&job, &ctx);
        if result_tx.send(result).is_err() {
            break;
        }
    }
    drop(result_tx);
}

/// Spawn `workers` publish workers. Caller must drop its result sender after this so the
/// collector sees the channel close.
pub fn spawn_publish_workers(
    job_rx: &Receiver<Job>,
    result_tx: &Sender<PublishResult>,
    ctx: &Arc<PublishContext>,
    workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..workers)
        .map(|_| {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let ctx = Arc::clone(ctx);
            thread::spawn(move || worker_loop(job_rx, result_tx, ctx))
        })
        .collect()
}

/// Join worker threads after the result stream is drained.
pub fn shutdown_workers(worker_handles: Vec<JoinHandle<()>>) -> Result<()> {
    let mut panicked = 0;
    for h in worker_handles {
        if h.join().is_err() {
            panicked += 1;
        }
    }
    if panicked > 0 {
        anyhow::bail!("{} worker thread(s) panicked", panicked);
    }
    Ok(())
}

/// Main orchestrator: publish every job on a bounded pool and collect the results.
///
/// Jobs are dispatched in order; completion order is whatever the workers produce. The calling
/// thread is the collector: it alone updates [`AggregateStats`] and the progress bar, on every
/// result and on a fixed tick.
pub fn publish_all(jobs: Vec<Job>, ctx: Arc<PublishContext>, opts: PoolOpts) -> Result<Report> {
    let total = jobs.len();
    let mut stats = AggregateStats::new(total);
    if total == 0 {
        return Ok(Report {
            results: Vec::new(),
            stats,
        });
    }

    let workers = effective_workers(opts.workers, total);
    debug!("Publishing {} directories with {} workers", total, workers);

    let channels = create_pool_channels(total);
    for job in jobs {
        // Capacity equals the job count, so this never blocks.
        channels
            .job_tx
            .send(job)
            .map_err(|_| anyhow::anyhow!("job queue closed early"))?;
    }
    drop(channels.job_tx);

    let worker_handles =
        spawn_publish_workers(&channels.job_rx, &channels.result_tx, &ctx, workers);
    // Dropping the last sender closes the channel once workers exit.
    drop(channels.result_tx);

    let mut progress = PublishProgress::new(total, opts.show_progress);
    let mut results = Vec::with_capacity(total);
    loop {
        match channels.result_rx.recv_timeout(ProgressConsts::TICK) {
            Ok(result) => {
                stats.record(&result);
                progress.job_done(&stats);
                results.push(result);
            }
            Err(RecvTimeoutError::Timeout) => progress.tick(&stats),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    progress.finish(&stats);

    shutdown_workers(worker_handles)?;
    debug!(
        "main: result channel closed, {} of {} results",
        results.len(),
        total
    );
    Ok(Report { results, stats })
}
