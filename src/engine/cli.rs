//! CLI command handler: enumerate, preflight, publish on the pool, summarize.

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use log::{debug, error, info, warn};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::engine::arg_parser::Cli;
use crate::engine::runner::{Cmd, CommandRunner, SystemRunner};
use crate::engine::summary::{print_banner, print_summary, write_report};
use crate::pipeline::{PoolOpts, publish_all, read_dirs_from_file, scan_directories};
use crate::publish::{Identity, PublishContext};
use crate::utils::config::{PackagePaths, Timeouts};
use crate::utils::fd_limit::effective_workers;
use crate::utils::{apply_env_to_opts, apply_file_to_opts, load_gitmax_toml, setup_logging};
use crate::{Job, Opts, Visibility};

/// Layer options: defaults, then the config file, then env (`.env` included), then CLI flags.
/// Also sets up logging, since `verbose` may come from the file.
fn setup_opts(cli: &Cli, cwd: &Path) -> Result<Opts> {
    let file = load_gitmax_toml(cli.config.as_deref(), cwd);
    let file_verbose = file.as_ref().ok().and_then(|f| f.as_ref()?.verbose());
    setup_logging(cli.verbose || file_verbose.unwrap_or(false));

    let mut opts = Opts::default();
    if let Some(file) = file? {
        apply_file_to_opts(&file, &mut opts);
    }
    apply_env_to_opts(cwd, &mut opts);
    apply_cli_to_opts(cli, &mut opts);
    Ok(opts)
}

/// Last layer: flags given on the command line. Switches only ever turn a setting on (or LFS
/// off); an absent switch leaves the file/env value alone.
pub fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) {
    if cli.owner.is_some() {
        opts.owner = cli.owner.clone();
    }
    if let Some(w) = cli.workers {
        opts.workers = w;
    }
    if let Some(d) = cli.depth {
        opts.max_depth = d;
    }
    if cli.verbose {
        opts.verbose = true;
    }
    if cli.no_lfs {
        opts.use_lfs = false;
    }
    if cli.private {
        opts.visibility = Visibility::Private;
    }
    opts.dry_run = cli.dry_run;
    opts.report_path = cli.report.clone();
}

/// List file wins over a scan root.
fn enumerate(cli: &Cli, opts: &Opts) -> Result<Vec<Job>> {
    if let Some(file) = &cli.file {
        return read_dirs_from_file(file);
    }
    match cli.scan_root() {
        Some(root) => scan_directories(root, opts.max_depth),
        None => Ok(Vec::new()),
    }
}

/// `git` must be runnable; a missing `gh` is only warned about since remote creation is
/// best-effort.
fn preflight(runner: &dyn CommandRunner) -> Result<()> {
    let git = runner.run(&Cmd::git(["--version"]).timeout(Timeouts::PREFLIGHT));
    if !git.success {
        bail!("git is not available: {}", git.stderr.trim());
    }
    debug!("{}", git.stdout.trim());
    let gh = runner.run(&Cmd::gh(["--version"]).timeout(Timeouts::PREFLIGHT));
    if !gh.success {
        warn!(
            "gh is not available ({}); remote repositories will not be created",
            gh.stderr.trim()
        );
    }
    Ok(())
}

/// Configured owner, or the account `gh` is logged in as.
pub fn resolve_owner(configured: Option<&str>, runner: &dyn CommandRunner) -> Result<String> {
    if let Some(owner) = configured.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(owner.to_string());
    }
    let out = runner.run(
        &Cmd::gh(["api", "user", "--jq", ".login"]).timeout(Timeouts::PREFLIGHT),
    );
    let login = out.stdout.trim();
    if out.success && !login.is_empty() {
        debug!("Owner from gh: {}", login);
        return Ok(login.to_string());
    }
    bail!(
        "could not determine repository owner; pass --owner or set {}",
        PackagePaths::get().env_var("owner")
    )
}

/// Run one publish session. Exit status reflects only usage problems and an empty job set;
/// individual job failures are reported in the summary. Nothing is written locally unless
/// `--report` is given.
pub fn handle_run(cli: &Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("current directory")?;
    let opts = setup_opts(cli, &cwd)?;
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );

    if cli.has_no_source() {
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::FAILURE);
    }

    info!("Scanning directories...");
    let jobs = enumerate(cli, &opts)?;
    if jobs.is_empty() {
        error!("No directories found to process");
        return Ok(ExitCode::FAILURE);
    }

    let runner = SystemRunner;
    if opts.dry_run {
        warn!("RUNNING IN DRY-RUN MODE. NO REPOSITORY WILL BE CREATED OR PUSHED.");
    } else {
        preflight(&runner)?;
    }
    let owner = resolve_owner(opts.owner.as_deref(), &runner)?;
    let identity = Identity::new(owner, opts.email.clone());

    let workers = effective_workers(opts.workers, jobs.len());
    print_banner(
        jobs.len(),
        workers,
        opts.use_lfs,
        opts.dry_run,
        &identity.owner,
    );

    let ctx = Arc::new(PublishContext::from_opts(&opts, identity));
    let report = publish_all(
        jobs,
        ctx,
        PoolOpts {
            workers,
            show_progress: true,
        },
    )?;
    print_summary(&report, opts.dry_run);

    // Only an explicitly requested report touches the filesystem; a write error is logged so the
    // exit status still ignores job outcomes.
    if let Some(path) = &opts.report_path {
        match write_report(path, &report.results) {
            Ok(()) => info!("Results written to {}", path.display()),
            Err(e) => error!("{:#}", e),
        }
    }
    Ok(ExitCode::SUCCESS)
}
