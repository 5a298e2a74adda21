//! Worker pool: every job yields exactly one result and the counters agree.

mod common;

use common::{ScriptedRunner, is_git, happy_response, test_ctx, write_two_files};
use gitmax::{CmdOutput, Job, PoolOpts, publish_all};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

fn opts(workers: usize) -> PoolOpts {
    PoolOpts {
        workers,
        show_progress: false,
    }
}

#[test]
fn test_publish_all_empty() {
    let runner = Arc::new(ScriptedRunner::happy());
    let report = publish_all(Vec::new(), Arc::new(test_ctx(runner)), opts(4)).unwrap();
    assert!(report.results.is_empty());
    assert_eq!(report.stats.total(), 0);
    assert!(report.stats.is_done());
}

#[test]
fn test_publish_all_mixed_outcomes() {
    let tmp = TempDir::new().unwrap();
    let mut jobs = Vec::new();
    for i in 0..12 {
        let dir = tmp.path().join(format!("proj{i}"));
        std::fs::create_dir_all(&dir).unwrap();
        write_two_files(&dir);
        jobs.push(Job::new(dir));
    }
    jobs.push(Job::new(tmp.path().join("missing-1")));
    jobs.push(Job::new(tmp.path().join("missing-2")));

    // proj3 cannot be pushed.
    let runner = Arc::new(ScriptedRunner::new(|cmd| {
        if is_git(cmd, &["push"])
            && cmd
                .cwd
                .as_ref()
                .is_some_and(|d| d.ends_with("proj3"))
        {
            CmdOutput::failed("fatal: repository not found")
        } else {
            happy_response(cmd)
        }
    }));
    let report = publish_all(jobs, Arc::new(test_ctx(runner)), opts(5)).unwrap();

    let stats = &report.stats;
    assert_eq!(report.results.len(), 14);
    assert_eq!(stats.total(), 14);
    assert_eq!(stats.completed(), 14);
    assert_eq!(stats.success(), 11);
    assert_eq!(stats.failed(), 3);
    assert_eq!(stats.completed(), stats.success() + stats.failed());
    assert!(stats.is_done());
    assert!(stats.eta().is_some());

    let failed: HashSet<String> = report.failures().map(|r| r.dir_name()).collect();
    assert_eq!(
        failed,
        HashSet::from([
            "proj3".to_string(),
            "missing-1".to_string(),
            "missing-2".to_string()
        ])
    );
    let unique: HashSet<_> = report.results.iter().map(|r| r.path.clone()).collect();
    assert_eq!(unique.len(), 14);
}

#[test]
fn test_publish_all_more_workers_than_jobs() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("solo");
    std::fs::create_dir_all(&dir).unwrap();
    let runner = Arc::new(ScriptedRunner::happy());
    let report =
        publish_all(vec![Job::new(&dir)], Arc::new(test_ctx(runner.clone())), opts(64)).unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(runner.count("git", &["init"]), 1);
}

#[test]
fn test_publish_all_zero_workers_still_runs() {
    let tmp = TempDir::new().unwrap();
    let runner = Arc::new(ScriptedRunner::happy());
    let report = publish_all(
        vec![Job::new(tmp.path().join("gone"))],
        Arc::new(test_ctx(runner)),
        opts(0),
    )
    .unwrap();
    assert_eq!(report.stats.failed(), 1);
}
