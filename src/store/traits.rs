//! Store Layer - Core Traits
//!
//! The host's durable store for tree snapshots. Implementations live with
//! the host (browser storage, a database, a file); the engine only calls
//! through this trait.

use async_trait::async_trait;

use crate::domain::{DomainResult, Tree};
use crate::moves::ReorderNotification;

/// Durable home of the tree snapshot and the one-time migration flag
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Fetch the stored snapshot, `None` on first run
    async fn get_tree(&self) -> DomainResult<Option<Tree>>;

    /// Replace the stored snapshot
    async fn set_tree(&self, tree: &Tree) -> DomainResult<()>;

    /// Targeted write of one container's final sequence, restamped with the
    /// engine's `gap` so stored keys match the session tree
    async fn apply_reorder(&self, notification: &ReorderNotification, gap: i64) -> DomainResult<()>;

    /// Whether the order-key migration already ran against this store
    async fn is_migrated(&self) -> DomainResult<bool>;

    async fn mark_migrated(&self) -> DomainResult<()>;
}
