//! Gitmax: publish every directory under a root as its own GitHub repository, in parallel.

pub mod engine;
pub mod pipeline;
pub mod publish;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::{Cmd, CmdOutput, CommandRunner, SystemRunner};
pub use pipeline::{PoolOpts, Report, publish_all};
pub use publish::{Identity, PublishContext, publish_dir};

/// Result alias used by public gitmax API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
