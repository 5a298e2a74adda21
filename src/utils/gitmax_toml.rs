//! Load `.gitmax.toml` and environment overrides (CLI only). The library takes everything through
//! [`Opts`](crate::Opts) and [`PublishContext`](crate::publish::PublishContext).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::utils::config::PackagePaths;
use crate::{Opts, Visibility};

#[derive(Debug, Default, Deserialize)]
pub struct GitmaxToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    owner: Option<String>,
    email: Option<String>,
    host: Option<String>,
    workers: Option<usize>,
    depth: Option<usize>,
    lfs: Option<bool>,
    visibility: Option<Visibility>,
    verbose: Option<bool>,
}

impl GitmaxToml {
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config")
    }

    /// `verbose` from the file; read before logging is set up.
    pub fn verbose(&self) -> Option<bool> {
        self.settings.verbose
    }
}

/// Load the config file: `explicit` when given (must exist), else `.gitmax.toml` in `dir` when
/// present. A file that exists but does not parse is an error either way.
pub fn load_gitmax_toml(explicit: Option<&Path>, dir: &Path) -> Result<Option<GitmaxToml>> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = dir.join(PackagePaths::get().config_filename());
            if !p.is_file() {
                return Ok(None);
            }
            p
        }
    };
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    GitmaxToml::parse(&s)
        .with_context(|| format!("config {}", path.display()))
        .map(Some)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
/// dry_run is never in the file.
pub fn apply_file_to_opts(file: &GitmaxToml, opts: &mut Opts) {
    let s = &file.settings;
    if s.owner.is_some() {
        opts.owner = s.owner.clone();
    }
    if s.email.is_some() {
        opts.email = s.email.clone();
    }
    apply_file_opt!(s, opts, host => host);
    apply_file_opt!(s, opts, workers => workers);
    apply_file_opt!(s, opts, depth => max_depth);
    apply_file_opt!(s, opts, lfs => use_lfs);
    apply_file_opt!(s, opts, visibility => visibility);
    apply_file_opt!(s, opts, verbose => verbose);
}

/// Apply `GITMAX_OWNER` / `GITMAX_EMAIL`. Loads `.env` from `dir` first without overriding
/// variables that are already set.
pub fn apply_env_to_opts(dir: &Path, opts: &mut Opts) {
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
    }
    let paths = PackagePaths::get();
    if let Some(owner) = non_empty_env(&paths.env_var("owner")) {
        opts.owner = Some(owner);
    }
    if let Some(email) = non_empty_env(&paths.env_var("email")) {
        opts.email = Some(email);
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
