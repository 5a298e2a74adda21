use clap::Parser;
use std::path::PathBuf;

/// Publish every directory under a root (or from a list file) as its own GitHub repository.
#[derive(Clone, Parser)]
#[command(name = "gitmax")]
#[command(
    about = "Bulk-publish local directories as GitHub repositories; use --dry-run to preview."
)]
pub struct Cli {
    /// Root directory to scan. Every directory under it (root included) becomes a repository.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Root directory to scan (same as PATH).
    #[arg(long, short = 'd', value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// File listing one directory per line (`#` comments allowed).
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Number of parallel workers. Default: 15.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Max directory depth for the tree scan. Default: 20.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub depth: Option<usize>,

    /// Report what would be published; run no mutating command.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not register files over 100 MiB with Git LFS.
    #[arg(long)]
    pub no_lfs: bool,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Account or organisation owning the created repositories. Default: GITMAX_OWNER, config, or the `gh` login.
    #[arg(long)]
    pub owner: Option<String>,

    /// Create private repositories instead of public ones.
    #[arg(long)]
    pub private: bool,

    /// Path to a config file. Default: `.gitmax.toml` in the current directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write every result as JSON to FILE.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Scan root: `--directory` wins over PATH. A list file, when given, wins over both.
    pub fn scan_root(&self) -> Option<&PathBuf> {
        self.directory.as_ref().or(self.path.as_ref())
    }

    /// True when neither a scan root nor a list file was given.
    pub fn has_no_source(&self) -> bool {
        self.scan_root().is_none() && self.file.is_none()
    }
}
