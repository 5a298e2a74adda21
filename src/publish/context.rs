//! Shared, read-only context for every publish job.

use anyhow::{Result, bail};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::runner::{Cmd, CmdOutput, CommandRunner, SystemRunner};
use crate::utils::config::{GitConsts, RetryConsts};
use crate::{Opts, Visibility};

/// Author identity and repository owner. Externalized so nothing is tied to one account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub owner: String,
    pub email: String,
}

impl Identity {
    /// `email` defaults to the owner's noreply address.
    pub fn new(owner: impl Into<String>, email: Option<String>) -> Self {
        let owner = owner.into();
        let email = email.unwrap_or_else(|| format!("{owner}@users.noreply.github.com"));
        Self { owner, email }
    }
}

/// Everything a worker needs to publish one directory. Shared behind an `Arc`; never mutated.
#[derive(Clone)]
pub struct PublishContext {
    pub runner: Arc<dyn CommandRunner>,
    pub identity: Identity,
    pub host: String,
    pub visibility: Visibility,
    pub use_lfs: bool,
    pub dry_run: bool,
    /// Unit for every backoff delay (retry waits are whole multiples of it). Zero disables waits.
    pub pace: Duration,
}

impl PublishContext {
    pub fn new(runner: Arc<dyn CommandRunner>, identity: Identity) -> Self {
        Self {
            runner,
            identity,
            host: GitConsts::DEFAULT_HOST.to_string(),
            visibility: Visibility::Public,
            use_lfs: true,
            dry_run: false,
            pace: RetryConsts::PACE,
        }
    }

    /// Production context from resolved options.
    pub fn from_opts(opts: &Opts, identity: Identity) -> Self {
        Self {
            host: opts.host.clone(),
            visibility: opts.visibility,
            use_lfs: opts.use_lfs,
            dry_run: opts.dry_run,
            ..Self::new(Arc::new(SystemRunner), identity)
        }
    }

    /// `owner/name` as `gh` expects it.
    pub fn repo_slug(&self, name: &str) -> String {
        format!("{}/{}", self.identity.owner, name)
    }

    /// Browser URL of the repository.
    pub fn repo_url(&self, name: &str) -> String {
        format!("https://{}/{}/{}", self.host, self.identity.owner, name)
    }

    /// Git remote URL of the repository.
    pub fn remote_url(&self, name: &str) -> String {
        format!("{}.git", self.repo_url(name))
    }

    pub fn run(&self, cmd: &Cmd) -> CmdOutput {
        self.runner.run(cmd)
    }

    /// Run a step whose failure never fails the job. The outcome is logged and discarded.
    pub fn best_effort(&self, cmd: &Cmd) {
        let out = self.run(cmd);
        if !out.success {
            debug!("best-effort step failed ({}): {}", cmd, out.stderr.trim());
        }
    }

    /// Run a required step; a failure becomes `"<what> failed: <stderr>"`.
    pub fn require(&self, cmd: &Cmd, what: &str) -> Result<CmdOutput> {
        let out = self.run(cmd);
        if !out.success {
            bail!("{} failed: {}", what, out.stderr.trim());
        }
        Ok(out)
    }

    /// Sleep for `units` pace units.
    pub fn pause(&self, units: u32) {
        let delay = self.pace * units;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    /// `gh repo view owner/name` succeeded within `timeout`.
    pub fn remote_exists(&self, name: &str, timeout: Duration) -> bool {
        let slug = self.repo_slug(name);
        self.run(&Cmd::gh(["repo", "view", slug.as_str()]).timeout(timeout))
            .success
    }
}
