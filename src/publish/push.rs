//! Forced push with bounded retries and error-classified backoff.

use anyhow::{Result, bail};
use log::debug;
use std::path::Path;

use super::context::PublishContext;
use crate::engine::runner::{Cmd, CmdOutput};
use crate::engine::tools::truncate_chars;
use crate::utils::config::{GitConsts, RetryConsts, Timeouts};

/// What went wrong with a push attempt, which decides how to react before retrying.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushFailure {
    /// The host rejected a file over its size limit; try pushing LFS objects.
    FileTooLarge,
    /// Rate limited or forbidden.
    RateLimited,
    /// Timeout or connection trouble.
    Network,
    /// Should not happen with `--force`; retried almost immediately.
    NonFastForward,
    Other,
}

impl PushFailure {
    /// Classify a failed push. The runner's own timeout flag wins; otherwise the error text is
    /// matched in a fixed order, so text matching several classes lands in the first.
    pub fn classify(out: &CmdOutput) -> Self {
        if out.timed_out {
            return PushFailure::Network;
        }
        let err = out.stderr.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| err.contains(n));
        if has(&["large file", "100 mb", "exceeds"]) {
            PushFailure::FileTooLarge
        } else if has(&["rate limit", "403"]) {
            PushFailure::RateLimited
        } else if has(&["timeout", "connection"]) {
            PushFailure::Network
        } else if has(&["non-fast-forward"]) {
            PushFailure::NonFastForward
        } else {
            PushFailure::Other
        }
    }

    /// Delay before the next attempt, in pace units. `attempt` is 0-based.
    pub fn backoff_units(&self, attempt: u32) -> u32 {
        match self {
            PushFailure::FileTooLarge => 2,
            PushFailure::RateLimited => 10 * (attempt + 1),
            PushFailure::Network => 5 * 2_u32.pow(attempt),
            PushFailure::NonFastForward => 1,
            PushFailure::Other => 2 * (attempt + 1),
        }
    }
}

fn push_cmd(dir: &Path) -> Cmd {
    Cmd::git([
        "push",
        "--set-upstream",
        GitConsts::REMOTE_NAME,
        GitConsts::DEFAULT_BRANCH,
        "--force",
    ])
    .cwd(dir)
    .timeout(Timeouts::PUSH)
}

fn lfs_push_cmd(dir: &Path) -> Cmd {
    Cmd::git([
        "lfs",
        "push",
        "--all",
        GitConsts::REMOTE_NAME,
        GitConsts::DEFAULT_BRANCH,
    ])
    .cwd(dir)
    .timeout(Timeouts::LFS_PUSH)
}

/// Force-push the default branch, retrying up to [`RetryConsts::PUSH_ATTEMPTS`] times.
/// Returns the number of attempts used on success.
pub fn push_with_retry(dir: &Path, ctx: &PublishContext) -> Result<u32> {
    let mut last_err = String::new();
    for attempt in 0..RetryConsts::PUSH_ATTEMPTS {
        let out = ctx.run(&push_cmd(dir));
        if out.success {
            return Ok(attempt + 1);
        }
        last_err = out.stderr.trim().to_string();
        let failure = PushFailure::classify(&out);
        debug!(
            "push {} attempt {} failed ({:?}): {}",
            dir.display(),
            attempt + 1,
            failure,
            truncate_chars(&last_err, RetryConsts::PUSH_ERROR_CHARS)
        );
        if failure == PushFailure::FileTooLarge {
            ctx.best_effort(&lfs_push_cmd(dir));
        }
        if attempt + 1 < RetryConsts::PUSH_ATTEMPTS {
            ctx.pause(failure.backoff_units(attempt));
        }
    }
    let shown = if last_err.is_empty() {
        "unknown".to_string()
    } else {
        truncate_chars(&last_err, RetryConsts::PUSH_ERROR_CHARS)
    };
    bail!(
        "git push failed after {} attempts: {}",
        RetryConsts::PUSH_ATTEMPTS,
        shown
    )
}
