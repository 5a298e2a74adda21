mod common;

use common::ScriptedRunner;
use gitmax::engine::tools::{path_relative_to, path_to_slash_string};
use gitmax::engine::{path_to_repo_name, resolve_owner, truncate_chars};
use gitmax::pipeline::{AggregateStats, lfs_patterns, parse_dir_list};
use gitmax::utils::{GitmaxToml, apply_file_to_opts, effective_workers};
use gitmax::{CmdOutput, Identity, Opts, PublishContext, PublishResult, Visibility};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// --- path_relative_to ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar/baz/qux");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("baz/qux"))
    );
}

#[test]
fn test_path_relative_not_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/other/qux");
    assert_eq!(path_relative_to(&path, &base), None);
}

#[test]
fn test_path_to_slash_string_normalizes_backslashes() {
    assert_eq!(
        path_to_slash_string(&PathBuf::from("assets\\video.mp4")),
        "assets/video.mp4"
    );
}

// --- path_to_repo_name ---

#[test]
fn test_repo_name_lowercases_and_dashes_spaces() {
    assert_eq!(path_to_repo_name(Path::new("/home/u/My Cool Project")), "my-cool-project");
}

#[test]
fn test_repo_name_collapses_and_trims_dashes() {
    assert_eq!(path_to_repo_name(Path::new("/x/--a  --  b--")), "a-b");
}

#[test]
fn test_repo_name_drops_invalid_chars() {
    assert_eq!(path_to_repo_name(Path::new("/x/Foo.Bar(2024)!")), "foobar2024");
    assert_eq!(path_to_repo_name(Path::new("/x/snake_case")), "snake_case");
}

#[test]
fn test_repo_name_fallback() {
    assert_eq!(path_to_repo_name(Path::new("/x/!!!")), "repo");
    assert_eq!(path_to_repo_name(Path::new("/x/日本語")), "repo");
    assert_eq!(path_to_repo_name(Path::new("/")), "repo");
}

#[test]
fn test_repo_name_truncated_without_trailing_dash() {
    let long = format!("/x/{}-{}", "a".repeat(99), "b".repeat(10));
    let name = path_to_repo_name(Path::new(&long));
    assert_eq!(name, "a".repeat(99));
    let exact = format!("/x/{}", "c".repeat(150));
    assert_eq!(path_to_repo_name(Path::new(&exact)).len(), 100);
}

// --- truncate_chars ---

#[test]
fn test_truncate_chars_multibyte() {
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("", 3), "");
}

// --- list parsing ---

#[test]
fn test_parse_dir_list_skips_blank_and_comments() {
    let dirs = parse_dir_list("\n# comment\n  /a  \n\t\n/b\n");
    assert_eq!(dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
}

#[test]
fn test_parse_dir_list_legacy_segments() {
    let dirs = parse_dir_list("gitit /one;gitit  /two dir ; junk; gitit\n");
    assert_eq!(dirs, vec![PathBuf::from("/one"), PathBuf::from("/two dir")]);
}

#[test]
fn test_parse_dir_list_keeps_duplicates() {
    assert_eq!(parse_dir_list("/a\n/a\n").len(), 2);
}

#[test]
fn test_parse_dir_list_marker_needs_separator() {
    // A path that merely starts with the marker is a plain entry.
    assert_eq!(parse_dir_list("gititfoo\n"), vec![PathBuf::from("gititfoo")]);
}

// --- lfs_patterns ---

#[test]
fn test_lfs_patterns_ext_and_literal() {
    let files = vec![
        "a/video.MP4".to_string(),
        "b/clip.mp4".to_string(),
        "data/blob".to_string(),
        "x.tar.gz".to_string(),
    ];
    let patterns: Vec<String> = lfs_patterns(&files).into_iter().collect();
    assert_eq!(patterns, vec!["*.gz", "*.mp4", "data/blob"]);
}

// --- stats ---

fn result(success: bool, lfs: usize) -> PublishResult {
    PublishResult {
        success,
        lfs_files: lfs,
        ..PublishResult::new(Path::new("/p"))
    }
}

#[test]
fn test_stats_invariant_holds_after_each_record() {
    let mut stats = AggregateStats::new(4);
    assert_eq!(stats.eta(), None);
    for r in [result(true, 1), result(false, 0), result(true, 2), result(false, 0)] {
        stats.record(&r);
        assert_eq!(stats.completed(), stats.success() + stats.failed());
        assert!(stats.completed() <= stats.total());
    }
    assert_eq!(stats.success(), 2);
    assert_eq!(stats.failed(), 2);
    assert_eq!(stats.lfs_files(), 3);
    assert!(stats.is_done());
}

// --- types ---

#[test]
fn test_visibility_flag() {
    assert_eq!(Visibility::default().gh_flag(), "--public");
    assert_eq!(Visibility::Private.gh_flag(), "--private");
}

#[test]
fn test_result_serializes_for_report() {
    let r = PublishResult {
        success: true,
        message: "Success (3 files)".into(),
        repo_url: "https://github.com/octo/p".into(),
        total_files: 3,
        ..PublishResult::new(Path::new("/p"))
    };
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["message"], "Success (3 files)");
    assert_eq!(json["total_files"], 3);
    assert_eq!(json["path"], "/p");
}

#[test]
fn test_context_urls() {
    let runner = Arc::new(ScriptedRunner::happy());
    let mut ctx = PublishContext::new(runner, Identity::new("octo", Some("o@x.io".into())));
    ctx.host = "git.example.com".into();
    assert_eq!(ctx.identity.email, "o@x.io");
    assert_eq!(ctx.repo_slug("p"), "octo/p");
    assert_eq!(ctx.repo_url("p"), "https://git.example.com/octo/p");
    assert_eq!(ctx.remote_url("p"), "https://git.example.com/octo/p.git");
}

// --- config ---

#[test]
fn test_config_file_applies_present_fields_only() {
    let file = GitmaxToml::parse(
        "[settings]\nowner = \"acme\"\nworkers = 4\nlfs = false\nvisibility = \"private\"\n",
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.owner.as_deref(), Some("acme"));
    assert_eq!(opts.workers, 4);
    assert!(!opts.use_lfs);
    assert_eq!(opts.visibility, Visibility::Private);
    assert_eq!(opts.max_depth, 20);
    assert_eq!(opts.host, "github.com");
    assert_eq!(file.verbose(), None);
}

#[test]
fn test_config_file_rejects_bad_types() {
    assert!(GitmaxToml::parse("[settings]\nworkers = \"many\"\n").is_err());
}

#[test]
fn test_effective_workers_clamps() {
    assert_eq!(effective_workers(0, 10), 1);
    assert_eq!(effective_workers(15, 3), 3);
    assert_eq!(effective_workers(2, 0), 1);
    assert!(effective_workers(4, 100) <= 4);
}

// --- owner resolution ---

#[test]
fn test_resolve_owner_prefers_configured() {
    let runner = ScriptedRunner::happy();
    assert_eq!(resolve_owner(Some(" acme "), &runner).unwrap(), "acme");
    assert!(runner.calls().is_empty());
}

#[test]
fn test_resolve_owner_falls_back_to_gh() {
    let runner = ScriptedRunner::new(|_| CmdOutput::ok("octocat\n"));
    assert_eq!(resolve_owner(None, &runner).unwrap(), "octocat");
    assert_eq!(runner.count("gh", &["api", "user", "--jq", ".login"]), 1);
}

#[test]
fn test_resolve_owner_fails_without_gh() {
    let runner = ScriptedRunner::new(|_| CmdOutput::failed("gh: not logged in"));
    let err = resolve_owner(Some("  "), &runner).unwrap_err();
    assert!(err.to_string().contains("GITMAX_OWNER"));
}
