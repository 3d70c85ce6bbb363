//! Move Classifier & Executor
//!
//! Turns a completed drag into a new tree snapshot. Every abnormal input
//! (no target, self-drop, ids that do not resolve) degrades to "no change"
//! and hands back the input tree.

mod item_moves;
mod list_moves;
mod notify;

use drag_session::{DragEnd, DragKind, DropTarget};
use serde::Serialize;

use crate::config::ReorderConfig;
use crate::domain::{DomainResult, Tree};
use crate::locate::{resolve_category_move, resolve_group_move, resolve_item_move};

pub use item_moves::classify;
pub use notify::ReorderNotification;

/// The five item move shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTopology {
    /// Within the category's direct list
    ReorderCategoryItems,
    /// Direct list into a group
    PromoteOut,
    /// Group into the direct list
    PromoteIn,
    /// Within one group
    ReorderGroupItems,
    /// From one group into another of the same category
    MoveBetweenGroups,
}

/// What a move changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Item(MoveTopology),
    Group,
    Category,
}

/// Why a drag left the tree unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    /// Released outside any droppable region
    NoTarget,
    /// Dropped on itself
    SelfDrop,
    /// Source or target not found in scope
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEffect {
    Moved(Applied),
    Unchanged(NoopReason),
}

/// Result of executing one drag
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// The new snapshot, or the input snapshot for a no-op
    pub tree: Tree,
    pub effect: MoveEffect,
    /// One entry per container the move touched
    pub notifications: Vec<ReorderNotification>,
}

impl MoveOutcome {
    fn unchanged(tree: &Tree, reason: NoopReason) -> Self {
        Self {
            tree: tree.clone(),
            effect: MoveEffect::Unchanged(reason),
            notifications: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.effect, MoveEffect::Unchanged(_))
    }

    pub fn topology(&self) -> Option<MoveTopology> {
        match self.effect {
            MoveEffect::Moved(Applied::Item(topology)) => Some(topology),
            _ => None,
        }
    }
}

/// Executes drags against tree snapshots with one ordering configuration
#[derive(Debug, Clone, Default)]
pub struct ReorderEngine {
    config: ReorderConfig,
}

impl ReorderEngine {
    pub fn new(config: ReorderConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Execute a drag in the category that owns the dragged node
    pub fn execute(&self, tree: &Tree, drag: &DragEnd) -> MoveOutcome {
        if let Err(reason) = precheck(drag) {
            return self.ignore(tree, drag, reason);
        }
        let owner = match drag.kind {
            DragKind::Item => tree.category_of_item(&drag.active_id),
            DragKind::Group => tree.category_of_group(&drag.active_id),
        };
        match owner {
            Some(category) => self.execute_in(tree, &category.id, drag),
            None => self.ignore(tree, drag, NoopReason::Unresolved),
        }
    }

    /// Execute a drag with resolution scoped to `category_id`
    pub fn execute_in(&self, tree: &Tree, category_id: &str, drag: &DragEnd) -> MoveOutcome {
        let over = match precheck(drag) {
            Ok(over) => over,
            Err(reason) => return self.ignore(tree, drag, reason),
        };
        let Some(category) = tree.category(category_id) else {
            return self.ignore(tree, drag, NoopReason::Unresolved);
        };
        let gap = self.config.order_gap;

        match drag.kind {
            DragKind::Item => {
                let Some(resolved) = resolve_item_move(category, &drag.active_id, over) else {
                    return self.ignore(tree, drag, NoopReason::Unresolved);
                };
                let result = item_moves::move_item(category, &resolved, gap);
                tracing::debug!(
                    active = %drag.active_id,
                    category = %category_id,
                    topology = ?result.topology,
                    "item moved"
                );
                MoveOutcome {
                    tree: tree.with_category(result.category),
                    effect: MoveEffect::Moved(Applied::Item(result.topology)),
                    notifications: result.notifications,
                }
            }
            DragKind::Group => {
                let Some(mv) = resolve_group_move(category, &drag.active_id, over) else {
                    return self.ignore(tree, drag, NoopReason::Unresolved);
                };
                let (next, notification) = list_moves::reorder_groups(category, mv, gap);
                tracing::debug!(
                    active = %drag.active_id,
                    category = %category_id,
                    from = mv.from,
                    to = mv.to,
                    "group moved"
                );
                MoveOutcome {
                    tree: tree.with_category(next),
                    effect: MoveEffect::Moved(Applied::Group),
                    notifications: vec![notification],
                }
            }
        }
    }

    /// Reorder the top-level categories: `active_id` takes the display slot of `over_id`
    pub fn reorder_categories(&self, tree: &Tree, active_id: &str, over_id: &str) -> MoveOutcome {
        let Some(mv) = resolve_category_move(tree, active_id, over_id) else {
            let reason = if active_id == over_id {
                NoopReason::SelfDrop
            } else {
                NoopReason::Unresolved
            };
            tracing::debug!(active = %active_id, over = %over_id, ?reason, "category drag ignored");
            return MoveOutcome::unchanged(tree, reason);
        };
        let (next, notification) = list_moves::reorder_categories(tree, mv, self.config.order_gap);
        tracing::debug!(active = %active_id, from = mv.from, to = mv.to, "category moved");
        MoveOutcome {
            tree: next,
            effect: MoveEffect::Moved(Applied::Category),
            notifications: vec![notification],
        }
    }

    fn ignore(&self, tree: &Tree, drag: &DragEnd, reason: NoopReason) -> MoveOutcome {
        tracing::debug!(
            active = %drag.active_id,
            over = ?drag.over,
            kind = drag.kind.as_str(),
            ?reason,
            "drag ignored"
        );
        MoveOutcome::unchanged(tree, reason)
    }
}

fn precheck(drag: &DragEnd) -> Result<&DropTarget, NoopReason> {
    if drag.is_self_drop() {
        return Err(NoopReason::SelfDrop);
    }
    drag.over.as_ref().ok_or(NoopReason::NoTarget)
}
