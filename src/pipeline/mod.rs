//! Pipeline components: enumeration, large-file detection, the worker pool and its counters.

pub mod context;
pub mod large_files;
pub mod orchestrator;
pub mod stats;
pub mod walk;

pub use context::{PoolChannels, PoolOpts, create_pool_channels};
pub use large_files::{
    count_files, find_files_over, find_large_files, lfs_patterns, nested_git_dirs,
};
pub use orchestrator::{Report, publish_all, shutdown_workers, spawn_publish_workers};
pub use stats::AggregateStats;
pub use walk::{
    WalkOutcome, parse_dir_list, read_dirs_from_file, run_walk_loop, scan_directories,
    to_outcome_walkdir,
};
