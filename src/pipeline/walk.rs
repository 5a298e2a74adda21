//! Directory enumeration: recursive tree scan bounded by depth, or a plain-text path list.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::Job;
use crate::engine::tools::{absolutize, is_vcs_name};
use crate::utils::config::GitConsts;

/// One result from a directory walk: either a directory to publish or an error with optional path.
pub enum WalkOutcome {
    Ok(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Non-directories are dropped.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> Option<WalkOutcome> {
    match r {
        Ok(entry) if entry.file_type().is_dir() => Some(WalkOutcome::Ok(entry.into_path())),
        Ok(_) => None,
        Err(err) => Some(WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        }),
    }
}

/// Every directory reachable from `root` within `max_depth` path segments, root included,
/// never descending into `.git`. Parents and children are both returned as separate jobs.
/// Unreadable subtrees are skipped; what was already collected is kept.
pub fn scan_directories(root: &Path, max_depth: usize) -> Result<Vec<Job>> {
    let root = absolutize(root).with_context(|| format!("resolve {}", root.display()))?;
    let iter = WalkDir::new(&root)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_vcs_name(e.file_name()))
        .filter_map(to_outcome_walkdir);
    Ok(run_walk_loop(iter))
}

/// Consume walk outcomes into jobs, logging (not failing on) errors.
pub fn run_walk_loop<I>(iter: I) -> Vec<Job>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut jobs = Vec::new();
    let mut skipped = 0_usize;
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok(path) => jobs.push(Job::new(path)),
            WalkOutcome::Err { msg, path } => {
                skipped += 1;
                debug!(
                    "skipped {}: {}",
                    path.as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<no-path>".to_string()),
                    msg
                );
            }
        }
    }
    if skipped > 0 {
        log::warn!("Skipped {} paths due to permission errors or access issues", skipped);
    }
    jobs
}

/// Read directory paths from a list file. See [`parse_dir_list`] for the format.
pub fn read_dirs_from_file(path: &Path) -> Result<Vec<Job>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read directory list {}", path.display()))?;
    Ok(parse_dir_list(&text).into_iter().map(Job::new).collect())
}

/// One path per line; blank lines and `#` comments skipped. A line in the legacy one-liner form
/// (`gitit <path>; gitit <path>; ...`) is unpacked into one entry per segment. Duplicates are kept.
pub fn parse_dir_list(text: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if legacy_path(line).is_some() {
            dirs.extend(line.split(';').filter_map(legacy_path).map(PathBuf::from));
        } else {
            dirs.push(PathBuf::from(line));
        }
    }
    dirs
}

/// `gitit <path>` -> `<path>`; None for anything else.
fn legacy_path(segment: &str) -> Option<&str> {
    let rest = segment.trim().strip_prefix(GitConsts::LEGACY_LIST_MARKER)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let path = rest.trim();
    (!path.is_empty()).then_some(path)
}
