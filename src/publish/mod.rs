//! The per-directory publish workflow and the pieces it is built from.

pub mod context;
pub mod push;
pub mod remote;
pub mod sync;
pub mod workflow;

pub use context::{Identity, PublishContext};
pub use push::{PushFailure, push_with_retry};
pub use remote::{ensure_remote_repo, verify_remote_repo};
pub use sync::{SyncState, sync_state};
pub use workflow::publish_dir;
