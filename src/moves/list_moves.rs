//! Single-list reorders
//!
//! The splice-then-restamp step shared by item reorders inside one
//! container, group reorders inside a category and top-level category
//! reorders.

use std::sync::Arc;

use crate::domain::{Category, Tree};
use crate::locate::ListMove;
use crate::order::{restamp_owned, sort_by_order, Ordered};

use super::notify::{ids_of, ReorderNotification};

/// Move the node at display position `from` to display position `to`, then
/// restamp. `to` is read against the post-removal sequence, so a node dropped
/// on a later sibling ends up after it.
pub(crate) fn reorder_list<T: Ordered>(nodes: &[T], mv: ListMove, gap: i64) -> Vec<T> {
    let mut sorted = sort_by_order(nodes);
    let node = sorted.remove(mv.from);
    let to = mv.to.min(sorted.len());
    sorted.insert(to, node);
    restamp_owned(sorted, 0, gap)
}

/// Reorder the group list of one category
pub(crate) fn reorder_groups(category: &Category, mv: ListMove, gap: i64) -> (Category, ReorderNotification) {
    let groups = reorder_list(&category.groups, mv, gap);
    let notification = ReorderNotification::CategoryGroups {
        category_id: category.id.clone(),
        group_ids: ids_of(&groups),
    };
    let next = Category {
        id: category.id.clone(),
        name: category.name.clone(),
        order: category.order,
        items: category.items.clone(),
        groups,
    };
    (next, notification)
}

/// Reorder the top-level category list
pub(crate) fn reorder_categories(tree: &Tree, mv: ListMove, gap: i64) -> (Tree, ReorderNotification) {
    let categories: Vec<Arc<Category>> = reorder_list(&tree.categories, mv, gap);
    let notification = ReorderNotification::Categories {
        category_ids: ids_of(&categories),
    };
    (Tree { categories }, notification)
}
