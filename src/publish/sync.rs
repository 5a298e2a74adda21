//! Read-only "already published?" check.

use std::path::Path;

use super::context::PublishContext;
use crate::engine::runner::Cmd;
use crate::utils::config::GitConsts;

/// Why a directory does or doesn't need publishing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    /// Clean tree, remote configured, nothing ahead of the upstream.
    Synced,
    NoGitDir,
    NoRemote,
    /// Dirty tree, commits ahead, or the upstream couldn't be queried.
    HasChanges,
}

impl SyncState {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncState::Synced)
    }
}

/// Best-effort sync check using only read-only commands. Any query that fails counts as
/// "not synced".
pub fn sync_state(dir: &Path, ctx: &PublishContext) -> SyncState {
    if !dir.join(GitConsts::VCS_DIR).exists() {
        return SyncState::NoGitDir;
    }

    let remote = ctx.run(&Cmd::git(["remote", "get-url", GitConsts::REMOTE_NAME]).cwd(dir));
    if !remote.success || remote.stdout.trim().is_empty() {
        return SyncState::NoRemote;
    }

    let status = ctx.run(&Cmd::git(["status", "--porcelain"]).cwd(dir));
    if !status.success || !status.stdout.trim().is_empty() {
        return SyncState::HasChanges;
    }

    let range = format!("{}/{}..HEAD", GitConsts::REMOTE_NAME, GitConsts::DEFAULT_BRANCH);
    let ahead = ctx.run(&Cmd::git(["rev-list", "--count", range.as_str()]).cwd(dir));
    if ahead.success && ahead.stdout.trim() == "0" {
        SyncState::Synced
    } else {
        SyncState::HasChanges
    }
}
