//! Per-directory publish workflow.
//!
//! Strictly sequential: resolve, sync check, dry-run short-circuit, count, metadata reset,
//! identity config, LFS registration, stage, commit, ensure remote, verify remote, wire remote,
//! push with retry, verify push. Every failure ends only this job; nothing escapes
//! [`publish_dir`].

use anyhow::{Result, bail};
use chrono::Local;
use log::debug;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use super::context::PublishContext;
use super::push::push_with_retry;
use super::remote::{ensure_remote_repo, verify_remote_repo};
use super::sync::sync_state;
use crate::engine::runner::Cmd;
use crate::engine::tools::{absolutize, path_to_repo_name};
use crate::pipeline::large_files::{count_files, find_large_files, lfs_patterns, nested_git_dirs};
use crate::utils::config::GitConsts;
use crate::{Job, PublishResult};

/// Publish one directory. Always returns a result; errors and panics become its failure message.
pub fn publish_dir(job: &Job, ctx: &PublishContext) -> PublishResult {
    let mut result = PublishResult::new(&job.path);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_workflow(job, ctx, &mut result)));
    match outcome {
        Ok(Ok(message)) => result.succeed(message),
        Ok(Err(e)) => result.fail(format!("{:#}", e)),
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            result.fail(format!("panic: {}", msg));
        }
    }
    if !result.success {
        debug!("{}: {}", job.path.display(), result.message);
    }
    result
}

/// The state machine. `Ok(message)` is a success message; `Err` is a failure message.
/// `result` is filled in as facts become known (path, URL, counts).
fn run_workflow(job: &Job, ctx: &PublishContext, result: &mut PublishResult) -> Result<String> {
    // 1. Resolve & validate
    let dir = absolutize(&job.path)?;
    result.path = dir.clone();
    if !dir.is_dir() {
        bail!("Directory does not exist");
    }
    let repo_name = path_to_repo_name(&dir);

    // 2. Sync check
    if sync_state(&dir, ctx).is_synced() {
        result.repo_url = ctx.repo_url(&repo_name);
        return Ok("SKIPPED - Already synced".to_string());
    }

    // 3. Dry run
    if ctx.dry_run {
        result.repo_url = ctx.repo_url(&repo_name);
        result.lfs_files = find_large_files(&dir).len();
        return Ok("Dry run - would push".to_string());
    }

    // 4. File count
    let total_files = count_files(&dir);
    result.total_files = total_files;

    // 5. Metadata reset
    reset_vcs_metadata(&dir);
    ctx.require(
        &Cmd::git(["init", "-b", GitConsts::DEFAULT_BRANCH]).cwd(&dir),
        "git init",
    )?;

    // 6. Identity / config
    configure_repo(&dir, ctx);

    // 7. Large-file registration
    let large_files = find_large_files(&dir);
    result.lfs_files = large_files.len();
    if !large_files.is_empty() && ctx.use_lfs {
        register_lfs(&dir, &large_files, ctx);
    }

    // 8. Stage
    let staged = stage_all(&dir, total_files, ctx)?;

    // 9. Commit
    commit(&dir, staged, ctx)?;

    // 10-11. Remote ensure + verify
    ensure_remote_repo(&repo_name, ctx);
    verify_remote_repo(&repo_name, ctx);

    // 12. Remote wiring
    wire_remote(&dir, &ctx.remote_url(&repo_name), ctx)?;

    // 13. Push
    let attempts = push_with_retry(&dir, ctx)?;
    debug!("{}: pushed in {} attempt(s)", dir.display(), attempts);

    // 14. Push verification
    verify_pushed_tree(&dir, total_files, ctx)?;

    // 15. Success
    result.repo_url = ctx.repo_url(&repo_name);
    Ok(format!("Success ({} files)", total_files))
}

/// Remove every nested `.git` directory, then the root's own. Removal errors are logged and
/// otherwise ignored; `git init` on a half-removed directory is what decides the job.
fn reset_vcs_metadata(dir: &Path) {
    let nested = nested_git_dirs(dir);
    if !nested.is_empty() {
        debug!("{}: removing {} nested .git dirs", dir.display(), nested.len());
    }
    for git_dir in nested {
        remove_git_dir(&git_dir);
    }
    let root_git = dir.join(GitConsts::VCS_DIR);
    if root_git.exists() {
        remove_git_dir(&root_git);
    }
}

/// Best-effort removal of one `.git` directory.
fn remove_git_dir(git_dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(git_dir) {
        debug!("could not remove {}: {}", git_dir.display(), e);
    }
}

fn configure_repo(dir: &Path, ctx: &PublishContext) {
    let settings = [
        ("user.name", ctx.identity.owner.as_str()),
        ("user.email", ctx.identity.email.as_str()),
        ("core.autocrlf", "false"),
        ("http.postBuffer", GitConsts::HTTP_POST_BUFFER),
    ];
    for (key, value) in settings {
        ctx.best_effort(&Cmd::git(["config", key, value]).cwd(dir));
    }
}

/// Initialize LFS and track both extension patterns and literal paths. If LFS can't be
/// initialized the job continues without it.
fn register_lfs(dir: &Path, large_files: &[String], ctx: &PublishContext) {
    let init = ctx.run(&Cmd::git(["lfs", "install", "--local"]).cwd(dir));
    if !init.success {
        debug!(
            "{}: git lfs unavailable, continuing without it: {}",
            dir.display(),
            init.stderr.trim()
        );
        return;
    }
    for pattern in lfs_patterns(large_files).iter().map(String::as_str) {
        ctx.best_effort(&Cmd::git(["lfs", "track", pattern]).cwd(dir));
    }
    for file in large_files.iter().map(String::as_str) {
        ctx.best_effort(&Cmd::git(["lfs", "track", file]).cwd(dir));
    }
}

fn staged_count(dir: &Path, ctx: &PublishContext) -> usize {
    let out = ctx.run(&Cmd::git(["diff", "--cached", "--name-only"]).cwd(dir));
    if out.success {
        out.stdout_lines().count()
    } else {
        0
    }
}

/// Stage the whole tree with no exclusions. Zero staged paths with a nonzero file count gets two
/// alternative `git add` forms before the job is failed.
fn stage_all(dir: &Path, total_files: usize, ctx: &PublishContext) -> Result<usize> {
    ctx.best_effort(&Cmd::git(["add", "-A"]).cwd(dir));
    let mut staged = staged_count(dir, ctx);
    if total_files > 0 && staged == 0 {
        debug!("{}: nothing staged, retrying add", dir.display());
        ctx.best_effort(&Cmd::git(["add", "."]).cwd(dir));
        ctx.best_effort(&Cmd::git(["add", "--all"]).cwd(dir));
        staged = staged_count(dir, ctx);
        if staged == 0 {
            bail!(
                "STAGING FAILED - {} files exist but 0 staged!",
                total_files
            );
        }
    }
    Ok(staged)
}

/// Single commit. An empty stage commits with `--allow-empty` so empty directories still get a
/// branch to push; any commit failure fails the job.
fn commit(dir: &Path, staged: usize, ctx: &PublishContext) -> Result<()> {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let message = format!("Auto commit {} - {} files", timestamp, staged);
    let mut cmd = Cmd::git(["commit", "-m", message.as_str()]).cwd(dir);
    if staged == 0 {
        cmd = cmd.args(["--allow-empty"]);
    }
    ctx.require(&cmd, "git commit")?;
    Ok(())
}

fn wire_remote(dir: &Path, remote_url: &str, ctx: &PublishContext) -> Result<()> {
    ctx.best_effort(&Cmd::git(["remote", "remove", GitConsts::REMOTE_NAME]).cwd(dir));
    ctx.require(
        &Cmd::git(["remote", "add", GitConsts::REMOTE_NAME, remote_url]).cwd(dir),
        "git remote add",
    )?;
    ctx.best_effort(&Cmd::git(["branch", "-M", GitConsts::DEFAULT_BRANCH]).cwd(dir));
    Ok(())
}

/// Guard against a push that "succeeded" with an empty tree. If listing the tree itself fails the
/// check is skipped.
fn verify_pushed_tree(dir: &Path, total_files: usize, ctx: &PublishContext) -> Result<()> {
    let out = ctx.run(&Cmd::git(["ls-tree", "-r", "--name-only", "HEAD"]).cwd(dir));
    if !out.success {
        debug!("{}: could not list pushed tree, skipping check", dir.display());
        return Ok(());
    }
    if total_files > 0 && out.stdout_lines().next().is_none() {
        bail!("EMPTY REPO - {} files exist but 0 pushed!", total_files);
    }
    Ok(())
}
