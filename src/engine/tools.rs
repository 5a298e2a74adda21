//! Path and naming utilities

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::utils::config::GitConsts;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Relative path rendered with forward slashes (what git and LFS patterns expect on every OS).
pub fn path_to_slash_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// True for a path component that names version-control metadata.
pub fn is_vcs_name(name: &std::ffi::OsStr) -> bool {
    name == GitConsts::VCS_DIR
}

/// Resolve to an absolute path. Relative paths are joined to the current directory; the path
/// need not exist (existence is checked by the caller).
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if let Ok(p) = path.canonicalize() {
        return Ok(p);
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("read current directory")?;
    Ok(cwd.join(path))
}

/// Derive a hosting-valid repository name from the final segment of `path`.
///
/// Lowercase, spaces to dashes, repeated dashes collapsed, everything outside `[a-z0-9_-]`
/// dropped, dashes trimmed, then cut to the 100-character limit without a trailing dash.
/// Falls back to `repo` when nothing usable is left.
pub fn path_to_repo_name(path: &Path) -> String {
    let raw = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lowered = raw.to_lowercase().replace(' ', "-");

    let mut collapsed = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let valid: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect();
    let mut name = valid.trim_matches('-').to_string();

    if name.len() > GitConsts::MAX_REPO_NAME_LEN {
        // ASCII only at this point, so byte truncation is char-safe.
        name.truncate(GitConsts::MAX_REPO_NAME_LEN);
        name = name.trim_end_matches('-').to_string();
    }
    if name.is_empty() {
        GitConsts::FALLBACK_REPO_NAME.to_string()
    } else {
        name
    }
}

/// First `max` characters of `s` (char-boundary safe).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
