pub mod config;
pub mod fd_limit;
pub mod gitmax_toml;
pub mod logger;

pub use config::*;
pub use fd_limit::{FDS_PER_WORKER, effective_workers, max_open_fds, max_workers_by_fd_limit};
pub use gitmax_toml::{GitmaxToml, apply_env_to_opts, apply_file_to_opts, load_gitmax_toml};
pub use logger::{Colors, setup_logging};
