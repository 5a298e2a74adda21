//! Gitmax CLI: bulk-publish directories as GitHub repositories; use --dry-run to preview.

use anyhow::Result;
use clap::Parser;
use gitmax::engine::arg_parser::Cli;
use gitmax::engine::handle_run;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> Result<ExitCode> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(code)
}
