//! Per-container reorder notifications
//!
//! Emitted after a successful move so a host can persist only the touched
//! containers. [`Tree::apply_notification`] replays one onto a snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    position_of, Category, ContainerId, DomainError, DomainResult, Entity, Group, Item, Tree,
};
use crate::order::{restamp_owned, sort_by_order, Ordered};

/// Final sequence of one container after a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReorderNotification {
    #[serde(rename_all = "camelCase")]
    GroupItems { group_id: String, item_ids: Vec<String> },
    /// Direct item list of a category
    #[serde(rename_all = "camelCase")]
    CategoryItems { category_id: String, item_ids: Vec<String> },
    #[serde(rename_all = "camelCase")]
    CategoryGroups { category_id: String, group_ids: Vec<String> },
    #[serde(rename_all = "camelCase")]
    Categories { category_ids: Vec<String> },
}

impl ReorderNotification {
    pub(crate) fn for_items(container: ContainerId<'_>, items: &[Item]) -> Self {
        let item_ids = ids_of(items);
        match container {
            ContainerId::CategoryItems(category_id) => ReorderNotification::CategoryItems {
                category_id: category_id.to_string(),
                item_ids,
            },
            ContainerId::GroupItems(group_id) => ReorderNotification::GroupItems {
                group_id: group_id.to_string(),
                item_ids,
            },
        }
    }
}

pub(crate) fn ids_of<T: Entity>(nodes: &[T]) -> Vec<String> {
    nodes.iter().map(|node| node.id().to_string()).collect()
}

impl Tree {
    /// Replay a notification: the named container takes exactly the listed
    /// nodes in the listed sequence, restamped with `gap`. Listed items are
    /// pulled out of whichever container of the same category held them.
    pub fn apply_notification(&self, notification: &ReorderNotification, gap: i64) -> DomainResult<Tree> {
        match notification {
            ReorderNotification::GroupItems { group_id, item_ids } => {
                let category = self
                    .category_of_group(group_id)
                    .ok_or_else(|| DomainError::NotFound(format!("Group {} not found", group_id)))?;
                let next = refill(category, ContainerId::GroupItems(group_id), item_ids, gap)?;
                Ok(self.with_category(next))
            }
            ReorderNotification::CategoryItems { category_id, item_ids } => {
                let category = self
                    .category(category_id)
                    .ok_or_else(|| DomainError::NotFound(format!("Category {} not found", category_id)))?;
                let next = refill(category, ContainerId::CategoryItems(category_id), item_ids, gap)?;
                Ok(self.with_category(next))
            }
            ReorderNotification::CategoryGroups { category_id, group_ids } => {
                let category = self
                    .category(category_id)
                    .ok_or_else(|| DomainError::NotFound(format!("Category {} not found", category_id)))?;
                let groups = arrange(&category.groups, group_ids, gap)?;
                Ok(self.with_category(Category {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    order: category.order,
                    items: category.items.clone(),
                    groups,
                }))
            }
            ReorderNotification::Categories { category_ids } => Ok(Tree {
                categories: arrange(&self.categories, category_ids, gap)?,
            }),
        }
    }
}

/// Listed nodes first in listed sequence, the rest after them in display order
fn arrange<T: Entity + Ordered>(nodes: &[T], ids: &[String], gap: i64) -> DomainResult<Vec<T>> {
    let mut arranged = Vec::with_capacity(nodes.len());
    for id in ids {
        let index = position_of(nodes, id)
            .ok_or_else(|| DomainError::NotFound(format!("Node {} not found", id)))?;
        arranged.push(nodes[index].clone());
    }
    let listed: HashSet<&str> = ids.iter().map(String::as_str).collect();
    arranged.extend(
        sort_by_order(nodes)
            .into_iter()
            .filter(|node| !listed.contains(node.id())),
    );
    Ok(restamp_owned(arranged, 0, gap))
}

// Unlisted items still in the container are kept after the listed ones until
// the notification for their new container pulls them out.
fn refill(category: &Category, container: ContainerId<'_>, item_ids: &[String], gap: i64) -> DomainResult<Category> {
    let mut filled = Vec::with_capacity(item_ids.len());
    for id in item_ids {
        let item = find_item(category, id)
            .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", id)))?;
        filled.push(item.clone());
    }
    let listed: HashSet<&str> = item_ids.iter().map(String::as_str).collect();
    let current: &[Item] = match container {
        ContainerId::CategoryItems(_) => &category.items,
        ContainerId::GroupItems(group_id) => category
            .group(group_id)
            .map_or(&[][..], |group| group.items.as_slice()),
    };
    filled.extend(
        sort_by_order(current)
            .into_iter()
            .filter(|item| !listed.contains(item.id.as_str())),
    );
    let filled = restamp_owned(filled, 0, gap);

    let items = if container == ContainerId::CategoryItems(&category.id) {
        filled.clone()
    } else {
        without(&category.items, &listed)
    };
    let groups = category
        .groups
        .iter()
        .map(|group| {
            if container == ContainerId::GroupItems(&group.id) {
                Arc::new(Group {
                    items: filled.clone(),
                    ..Group::clone(group)
                })
            } else if group.items.iter().any(|item| listed.contains(item.id.as_str())) {
                Arc::new(Group {
                    items: without(&group.items, &listed),
                    ..Group::clone(group)
                })
            } else {
                Arc::clone(group)
            }
        })
        .collect();

    Ok(Category {
        id: category.id.clone(),
        name: category.name.clone(),
        order: category.order,
        items,
        groups,
    })
}

fn find_item<'a>(category: &'a Category, item_id: &str) -> Option<&'a Item> {
    category
        .items
        .iter()
        .chain(category.groups.iter().flat_map(|group| group.items.iter()))
        .find(|item| item.id == item_id)
}

// Removal leaves the remaining keys untouched.
fn without(items: &[Item], listed: &HashSet<&str>) -> Vec<Item> {
    items
        .iter()
        .filter(|item| !listed.contains(item.id.as_str()))
        .cloned()
        .collect()
}
