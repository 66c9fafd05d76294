//! Remote usage accounting: traversal, tenant discovery and the
//! published snapshot.

pub mod enumerate;
pub mod snapshot;
pub mod walker;

pub use enumerate::list_subdirectories;
pub use snapshot::{SnapshotStore, UsageSnapshot, build_snapshot};
pub use walker::{MAX_DEPTH, total_size};

use thiserror::Error;

use crate::session::SessionError;

/// Failure of a traversal or refresh cycle. Denials the traversal does
/// not tolerate surface here as session errors.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("directory tree at {path} exceeds {limit} levels")]
    TooDeep { path: String, limit: usize },
}
