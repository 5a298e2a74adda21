//! Public and internal types for the gitmax API and pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::config::{FAILURE_MESSAGE_MAX_CHARS, GitConsts, PoolConsts};

/// One directory to publish. Created during enumeration and consumed exactly once by a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub path: PathBuf,
}

impl Job {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Outcome of one publish workflow run. Built by the worker that ran the job, then only read.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PublishResult {
    pub path: PathBuf,
    pub success: bool,
    pub message: String,
    /// Browser URL of the derived repository (empty when the job failed before it was known).
    pub repo_url: String,
    pub lfs_files: usize,
    pub total_files: usize,
}

impl PublishResult {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            ..Default::default()
        }
    }

    pub(crate) fn succeed(&mut self, message: impl Into<String>) {
        self.success = true;
        self.message = message.into();
    }

    pub(crate) fn fail(&mut self, message: impl AsRef<str>) {
        self.success = false;
        self.message = crate::engine::tools::truncate_chars(
            message.as_ref(),
            FAILURE_MESSAGE_MAX_CHARS,
        );
    }

    /// Final path segment, for compact listings.
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Visibility of repositories created on the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Flag passed to `gh repo create`.
    pub fn gh_flag(&self) -> &'static str {
        match self {
            Visibility::Public => "--public",
            Visibility::Private => "--private",
        }
    }
}

/// Full options (CLI + config file + env).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Account or organisation that owns the created repositories. Resolved through `gh` when None.
    pub owner: Option<String>,
    /// Commit author email. Defaults to the owner's noreply address.
    pub email: Option<String>,
    /// Hosting domain used for remote URLs.
    pub host: String,
    /// Worker pool size.
    pub workers: usize,
    /// Max directory depth for tree scan.
    pub max_depth: usize,
    /// Report what would happen; mutate nothing.
    pub dry_run: bool,
    /// Register files over the size threshold with Git LFS.
    pub use_lfs: bool,
    pub visibility: Visibility,
    /// Debug logging.
    pub verbose: bool,
    /// Write every result as JSON to this path.
    pub report_path: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            owner: None,
            email: None,
            host: GitConsts::DEFAULT_HOST.to_string(),
            workers: PoolConsts::DEFAULT_WORKERS,
            max_depth: PoolConsts::DEFAULT_SCAN_DEPTH,
            dry_run: false,
            use_lfs: true,
            visibility: Visibility::Public,
            verbose: false,
            report_path: None,
        }
    }
}
