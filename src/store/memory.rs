//! In-memory TreeStore
//!
//! Keeps the snapshot in process. Used by tests and by embedders that
//! persist elsewhere.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Tree};
use crate::moves::ReorderNotification;

use super::traits::TreeStore;

#[derive(Debug, Default)]
struct MemoryState {
    tree: Option<Tree>,
    migrated: bool,
    writes: usize,
}

#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    failing: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            failing: AtomicBool::new(false),
        }
    }

    /// Store seeded with an existing snapshot
    pub fn with_tree(tree: Tree) -> Self {
        let mut store = Self::new();
        store.state.get_mut().tree = Some(tree);
        store
    }

    /// Store whose migration flag is already set
    pub fn migrated(mut self) -> Self {
        self.state.get_mut().migrated = true;
        self
    }

    /// Make every write fail, as a host store might when offline
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Option<Tree> {
        self.state.lock().await.tree.clone()
    }

    /// Number of successful writes
    pub async fn write_count(&self) -> usize {
        self.state.lock().await.writes
    }

    fn check_writable(&self) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("store is not writable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TreeStore for MemoryStore {
    async fn get_tree(&self) -> DomainResult<Option<Tree>> {
        Ok(self.state.lock().await.tree.clone())
    }

    async fn set_tree(&self, tree: &Tree) -> DomainResult<()> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        state.tree = Some(tree.clone());
        state.writes += 1;
        Ok(())
    }

    async fn apply_reorder(&self, notification: &ReorderNotification, gap: i64) -> DomainResult<()> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let current = state
            .tree
            .as_ref()
            .ok_or_else(|| DomainError::NotFound("No stored tree".to_string()))?;
        let next = current.apply_notification(notification, gap)?;
        state.tree = Some(next);
        state.writes += 1;
        Ok(())
    }

    async fn is_migrated(&self) -> DomainResult<bool> {
        Ok(self.state.lock().await.migrated)
    }

    async fn mark_migrated(&self) -> DomainResult<()> {
        self.check_writable()?;
        self.state.lock().await.migrated = true;
        Ok(())
    }
}
