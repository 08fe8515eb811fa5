use crate::{
    domain::{Task, UpdateDiff},
    error::Result,
};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// Source of full task snapshots used to rebuild a board
#[async_trait]
pub trait SnapshotLoader: Send + Sync {
    /// Loads every task currently visible on the board
    async fn load_snapshot(&self) -> Result<Vec<Task>>;
}

/// Sink for the writes produced by board moves
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Applies every entry of `diff` as one bulk update.
    ///
    /// On failure the caller rebuilds from a fresh snapshot instead of
    /// compensating, so implementations should either apply the whole diff
    /// or tolerate it being replayed.
    async fn bulk_update(&self, diff: &UpdateDiff) -> Result<()>;
}
