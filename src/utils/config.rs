//! Application configuration constants.
//! Tuning, thresholds and timeouts in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// `.gitmax.toml`, looked up in the current directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable name for `key`, e.g. `GITMAX_OWNER`.
    pub fn env_var(&self, key: &str) -> String {
        format!("{}_{}", self.env_prefix, key.to_uppercase())
    }
}

// ---- Git / hosting ----

/// Fixed names used for every published repository.
pub struct GitConsts;

impl GitConsts {
    pub const VCS_DIR: &'static str = ".git";
    pub const DEFAULT_BRANCH: &'static str = "main";
    pub const REMOTE_NAME: &'static str = "origin";
    pub const DEFAULT_HOST: &'static str = "github.com";
    /// Fallback when a directory name has no usable characters.
    pub const FALLBACK_REPO_NAME: &'static str = "repo";
    /// Hosting limit on repository name length.
    pub const MAX_REPO_NAME_LEN: usize = 100;
    /// `http.postBuffer` value (500 MB).
    pub const HTTP_POST_BUFFER: &'static str = "524288000";
    /// Prefix of the legacy one-liner list format (`gitit <path>; gitit <path>`).
    pub const LEGACY_LIST_MARKER: &'static str = "gitit";
}

// ---- Large files ----

/// Files strictly larger than this are routed through LFS (bytes). 100 MiB.
pub const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

// ---- Timeouts ----

/// Per-command timeouts. Every subprocess wait is bounded by one of these.
pub struct Timeouts;

impl Timeouts {
    pub const GENERAL: Duration = Duration::from_secs(300);
    pub const PUSH: Duration = Duration::from_secs(600);
    pub const LFS_PUSH: Duration = Duration::from_secs(300);
    pub const REPO_CREATE: Duration = Duration::from_secs(60);
    pub const REPO_VIEW: Duration = Duration::from_secs(30);
    pub const REPO_VERIFY: Duration = Duration::from_secs(15);
    pub const PREFLIGHT: Duration = Duration::from_secs(30);
}

// ---- Retry ----

/// Attempt counts. Delays are expressed in pace units (see `PublishContext::pace`).
pub struct RetryConsts;

impl RetryConsts {
    pub const PUSH_ATTEMPTS: u32 = 5;
    pub const REPO_CREATE_ATTEMPTS: u32 = 3;
    pub const REPO_VERIFY_ATTEMPTS: u32 = 3;
    /// Characters of the last push error kept in the failure message.
    pub const PUSH_ERROR_CHARS: usize = 80;
    /// Production pace unit.
    pub const PACE: Duration = Duration::from_secs(1);
}

// ---- Worker pool ----

/// Pool sizing defaults.
pub struct PoolConsts;

impl PoolConsts {
    pub const DEFAULT_WORKERS: usize = 15;
    pub const DEFAULT_SCAN_DEPTH: usize = 20;
}

// ---- Progress / report ----

/// Progress bar and summary tuning.
pub struct ProgressConsts;

impl ProgressConsts {
    /// How often the progress line is refreshed when no job completes.
    pub const TICK: Duration = Duration::from_millis(500);
    /// Failed jobs listed in the final summary before eliding the rest.
    pub const FAILURE_LIST_CAP: usize = 20;
    /// Rough wall time of publishing one directory by hand, for the speedup line.
    pub const SEQUENTIAL_SECS_PER_DIR: f64 = 15.0;
    /// The speedup line is shown only for runs larger than this.
    pub const SPEEDUP_MIN_DIRS: usize = 10;
}

/// Upper bound on a job's failure message (characters).
pub const FAILURE_MESSAGE_MAX_CHARS: usize = 120;
