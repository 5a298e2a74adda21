//! Enumeration and per-directory file scans on real temp trees.

use gitmax::pipeline::{
    count_files, find_files_over, find_large_files, nested_git_dirs, read_dirs_from_file,
    scan_directories,
};
use gitmax::utils::config::LARGE_FILE_THRESHOLD;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// root/{a/{b/c}, d, .git/objects}
fn tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("a").join("b").join("c")).unwrap();
    fs::create_dir_all(root.join("d")).unwrap();
    fs::create_dir_all(root.join(".git").join("objects")).unwrap();
    fs::write(root.join("a").join("file.txt"), "x").unwrap();
    tmp
}

fn rel_paths(root: &Path, jobs: &[gitmax::Job]) -> Vec<PathBuf> {
    let root = root.canonicalize().unwrap();
    jobs.iter()
        .map(|j| j.path.strip_prefix(&root).unwrap().to_path_buf())
        .collect()
}

#[test]
fn test_scan_includes_root_and_is_sorted() {
    let tmp = tree();
    let jobs = scan_directories(tmp.path(), 20).unwrap();
    assert_eq!(
        rel_paths(tmp.path(), &jobs),
        vec![
            PathBuf::new(),
            PathBuf::from("a"),
            PathBuf::from("a/b"),
            PathBuf::from("a/b/c"),
            PathBuf::from("d"),
        ]
    );
    assert!(jobs.iter().all(|j| j.path.is_absolute()));
}

#[test]
fn test_scan_depth_bound() {
    let tmp = tree();
    let jobs = scan_directories(tmp.path(), 1).unwrap();
    assert_eq!(
        rel_paths(tmp.path(), &jobs),
        vec![PathBuf::new(), PathBuf::from("a"), PathBuf::from("d")]
    );
    let root_only = scan_directories(tmp.path(), 0).unwrap();
    assert_eq!(root_only.len(), 1);
}

#[test]
fn test_scan_never_enters_git() {
    let tmp = tree();
    let jobs = scan_directories(tmp.path(), 20).unwrap();
    assert!(
        jobs.iter()
            .all(|j| !j.path.components().any(|c| c.as_os_str() == ".git"))
    );
}

#[test]
fn test_read_dirs_from_file() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let list = tmp.path().join("dirs.txt");
    fs::write(
        &list,
        "# projects\n/srv/one\n\n  /srv/two  \ngitit /srv/three; gitit /srv/four\n/srv/one\n",
    )?;
    let jobs = read_dirs_from_file(&list)?;
    let paths: Vec<PathBuf> = jobs.into_iter().map(|j| j.path).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/srv/one"),
            PathBuf::from("/srv/two"),
            PathBuf::from("/srv/three"),
            PathBuf::from("/srv/four"),
            PathBuf::from("/srv/one"),
        ]
    );
    Ok(())
}

#[test]
fn test_read_dirs_from_missing_file_errors() {
    let tmp = TempDir::new().unwrap();
    let err = read_dirs_from_file(&tmp.path().join("nope.txt")).unwrap_err();
    assert!(format!("{:#}", err).contains("read directory list"));
}

#[test]
fn test_count_files_skips_git() {
    let tmp = tree();
    fs::write(tmp.path().join(".git").join("HEAD"), "ref").unwrap();
    fs::write(tmp.path().join("d").join("one"), "1").unwrap();
    assert_eq!(count_files(tmp.path()), 2);
}

#[test]
fn test_find_files_strictly_over_threshold() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("nested")).unwrap();
    File::create(root.join("nested").join("big.bin"))
        .unwrap()
        .set_len(LARGE_FILE_THRESHOLD + 1)
        .unwrap();
    File::create(root.join("edge.bin"))
        .unwrap()
        .set_len(LARGE_FILE_THRESHOLD)
        .unwrap();
    assert_eq!(find_large_files(root), vec!["nested/big.bin".to_string()]);
}

#[test]
fn test_find_files_over_custom_threshold_sorted() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::write(root.join("z.dat"), vec![0u8; 64]).unwrap();
    fs::write(root.join("a.dat"), vec![0u8; 64]).unwrap();
    fs::write(root.join("small"), vec![0u8; 8]).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join(".git").join("pack"), vec![0u8; 64]).unwrap();
    assert_eq!(
        find_files_over(root, 32),
        vec!["a.dat".to_string(), "z.dat".to_string()]
    );
}

#[test]
fn test_nested_git_dirs_excludes_root() {
    let tmp = tree();
    let root = tmp.path();
    fs::create_dir_all(root.join("a").join(".git").join("refs")).unwrap();
    fs::create_dir_all(root.join("a").join("b").join(".git")).unwrap();
    let mut found = nested_git_dirs(root);
    found.sort();
    assert_eq!(
        found,
        vec![
            root.join("a").join(".git"),
            root.join("a").join("b").join(".git"),
        ]
    );
}
