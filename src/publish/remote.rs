//! Remote repository management through `gh`.

use log::debug;

use super::context::PublishContext;
use crate::engine::runner::{Cmd, CmdOutput};
use crate::utils::config::{RetryConsts, Timeouts};

fn create_repo(name: &str, ctx: &PublishContext) -> CmdOutput {
    let slug = ctx.repo_slug(name);
    ctx.run(
        &Cmd::gh(["repo", "create", slug.as_str(), ctx.visibility.gh_flag()])
            .timeout(Timeouts::REPO_CREATE),
    )
}

/// Make sure `owner/name` exists on the host, creating it when absent.
///
/// Up to three create attempts with linear backoff; "already exists" counts as success. When all
/// three fail, one last best-effort create is issued. Never fails the job: the push step is the
/// real gate.
pub fn ensure_remote_repo(name: &str, ctx: &PublishContext) {
    if ctx.remote_exists(name, Timeouts::REPO_VIEW) {
        return;
    }
    for attempt in 0..RetryConsts::REPO_CREATE_ATTEMPTS {
        let out = create_repo(name, ctx);
        if out.success {
            // Give the host a moment to propagate the new repository.
            ctx.pause(1);
            return;
        }
        if out.stderr.to_lowercase().contains("already exists") {
            return;
        }
        debug!(
            "repo create {} attempt {} failed: {}",
            name,
            attempt + 1,
            out.stderr.trim()
        );
        ctx.pause(2 * (attempt + 1));
    }
    let out = create_repo(name, ctx);
    if !out.success {
        debug!("final repo create for {} failed: {}", name, out.stderr.trim());
    }
    ctx.pause(2);
}

/// Re-check that the repository is visible, up to three times. Returns whether it was seen; the
/// workflow proceeds either way.
pub fn verify_remote_repo(name: &str, ctx: &PublishContext) -> bool {
    for attempt in 0..RetryConsts::REPO_VERIFY_ATTEMPTS {
        if ctx.remote_exists(name, Timeouts::REPO_VERIFY) {
            return true;
        }
        if attempt + 1 < RetryConsts::REPO_VERIFY_ATTEMPTS {
            ctx.pause(2);
        }
    }
    debug!("repo {} not visible after verification; pushing anyway", name);
    false
}
