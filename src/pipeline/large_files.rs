//! File-tree scans of a single job directory: file count, oversized files, nested `.git` dirs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::engine::tools::{is_vcs_name, path_relative_to, path_to_slash_string};
use crate::utils::config::LARGE_FILE_THRESHOLD;

/// Entries of `dir` outside any `.git` directory. Unreadable entries are skipped.
fn walk_outside_vcs(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_vcs_name(e.file_name()))
        .filter_map(Result::ok)
}

/// Regular files under `dir`, excluding version-control metadata.
pub fn count_files(dir: &Path) -> usize {
    walk_outside_vcs(dir)
        .filter(|e| e.file_type().is_file())
        .count()
}

/// Files strictly larger than [`LARGE_FILE_THRESHOLD`], as sorted `/`-separated paths relative
/// to `dir`. Files whose metadata can't be read are skipped.
pub fn find_large_files(dir: &Path) -> Vec<String> {
    find_files_over(dir, LARGE_FILE_THRESHOLD)
}

/// [`find_large_files`] with an explicit threshold.
pub fn find_files_over(dir: &Path, threshold: u64) -> Vec<String> {
    let mut large: Vec<String> = walk_outside_vcs(dir)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.metadata().map(|m| m.len() > threshold).unwrap_or(false))
        .filter_map(|e| path_relative_to(e.path(), dir))
        .map(|rel| path_to_slash_string(&rel))
        .collect();
    large.sort();
    large
}

/// LFS track patterns: `*.<ext>` (lower-cased) for files with an extension, the literal relative
/// path otherwise.
pub fn lfs_patterns(large_files: &[String]) -> BTreeSet<String> {
    large_files
        .iter()
        .map(|f| match Path::new(f).extension() {
            Some(ext) => format!("*.{}", ext.to_string_lossy().to_lowercase()),
            None => f.clone(),
        })
        .collect()
}

/// Every `.git` directory strictly below `dir` (the root's own is excluded). Not descended into.
pub fn nested_git_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut it = WalkDir::new(dir).follow_links(false).into_iter();
    while let Some(entry) = it.next() {
        let Ok(entry) = entry else { continue };
        if entry.depth() > 0 && entry.file_type().is_dir() && is_vcs_name(entry.file_name()) {
            if entry.depth() > 1 {
                found.push(entry.path().to_path_buf());
            }
            it.skip_current_dir();
        }
    }
    found
}
