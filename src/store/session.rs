//! Reorder Session
//!
//! Holds the current tree for one UI session. Moves are applied
//! synchronously; persistence is a fire-and-forget task on the Tokio runtime.
//! Writes are not transactional: two quick moves produce two independent
//! writes and whichever finishes last wins in the store.

use std::sync::Arc;

use drag_session::DragEnd;
use tokio::task::JoinHandle;

use crate::config::PersistMode;
use crate::domain::{DomainResult, Tree};
use crate::migrate::{compact, migrate_with_gap, needs_compaction, needs_migration};
use crate::moves::{MoveOutcome, ReorderEngine, ReorderNotification};

use super::traits::TreeStore;

/// A move that has been applied to the session tree
#[derive(Debug)]
pub struct Committed {
    pub outcome: MoveOutcome,
    /// Background persistence task; `None` for no-ops or without a runtime
    pub persist: Option<JoinHandle<()>>,
}

pub struct ReorderSession<S: TreeStore + 'static> {
    engine: ReorderEngine,
    store: Arc<S>,
    tree: Tree,
}

impl<S: TreeStore + 'static> ReorderSession<S> {
    /// Load the snapshot, migrating once per store and compacting if configured
    pub async fn load(engine: ReorderEngine, store: Arc<S>) -> DomainResult<Self> {
        let config = engine.config().clone();
        let mut tree = store.get_tree().await?.unwrap_or_default();

        if !store.is_migrated().await? {
            if needs_migration(&tree) {
                tree = migrate_with_gap(&tree, config.order_gap);
                store.set_tree(&tree).await?;
            }
            store.mark_migrated().await?;
        } else if needs_migration(&tree) {
            tracing::warn!("store is flagged as migrated but holds nodes without order keys; migrating in memory");
            tree = migrate_with_gap(&tree, config.order_gap);
        }

        if config.compact_on_load && needs_compaction(&tree, config.min_gap) {
            tree = compact(&tree, config.order_gap, config.min_gap);
            store.set_tree(&tree).await?;
        }

        tracing::debug!(categories = tree.categories.len(), items = tree.count_items(), "session loaded");
        Ok(Self { engine, store, tree })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn engine(&self) -> &ReorderEngine {
        &self.engine
    }

    /// Apply a completed drag and schedule its persistence
    pub fn apply(&mut self, drag: &DragEnd) -> Committed {
        let outcome = self.engine.execute(&self.tree, drag);
        self.commit(outcome)
    }

    pub fn reorder_categories(&mut self, active_id: &str, over_id: &str) -> Committed {
        let outcome = self.engine.reorder_categories(&self.tree, active_id, over_id);
        self.commit(outcome)
    }

    fn commit(&mut self, outcome: MoveOutcome) -> Committed {
        if outcome.is_noop() {
            return Committed { outcome, persist: None };
        }
        self.tree = outcome.tree.clone();
        let persist = self.persist(&outcome);
        Committed { outcome, persist }
    }

    fn persist(&self, outcome: &MoveOutcome) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime available; move kept in memory only");
            return None;
        };
        let store = Arc::clone(&self.store);
        let handle = match self.engine.config().persist_mode {
            PersistMode::FullTree => {
                let tree = outcome.tree.clone();
                runtime.spawn(async move {
                    if let Err(e) = store.set_tree(&tree).await {
                        tracing::warn!(error = %e, "persisting tree failed");
                    }
                })
            }
            PersistMode::Targeted => {
                let notifications: Vec<ReorderNotification> = outcome.notifications.clone();
                let gap = self.engine.config().order_gap;
                runtime.spawn(async move {
                    for notification in &notifications {
                        if let Err(e) = store.apply_reorder(notification, gap).await {
                            tracing::warn!(error = %e, ?notification, "persisting reorder failed");
                            break;
                        }
                    }
                })
            }
        };
        Some(handle)
    }
}
