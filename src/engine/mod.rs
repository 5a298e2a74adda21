//! Engine: command-line surface, subprocess runner, progress and summary output, path tools.

pub mod arg_parser;
pub mod cli;
pub mod progress;
pub mod runner;
pub mod summary;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{apply_cli_to_opts, handle_run, resolve_owner};
pub use runner::{Cmd, CmdOutput, CommandRunner, SystemRunner};
pub use tools::{absolutize, path_to_repo_name, truncate_chars};
