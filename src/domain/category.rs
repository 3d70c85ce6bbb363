//! Category Entity
//!
//! Top-level node. Owns loose items directly as well as groups.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::group::Group;
use super::item::Item;
use crate::order::{append_order, sort_by_order, Ordered, DEFAULT_ORDER_GAP};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Loose items owned directly by the category
    #[serde(default)]
    pub items: Vec<Item>,
    /// Shared so untouched groups survive a move by reference
    #[serde(default)]
    pub groups: Vec<Arc<Group>>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order: None,
            items: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Append a loose item after the current maximum order
    pub fn push_item(&mut self, mut item: Item) {
        item.order = Some(append_order(&self.items, DEFAULT_ORDER_GAP));
        self.items.push(item);
    }

    /// Append a group after the current maximum order, adopting it
    pub fn push_group(&mut self, mut group: Group) {
        group.order = Some(append_order(&self.groups, DEFAULT_ORDER_GAP));
        group.category_id = self.id.clone();
        self.groups.push(Arc::new(group));
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.push_item(item);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.push_group(group);
        self
    }

    pub fn group(&self, group_id: &str) -> Option<&Arc<Group>> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// True if the item lives in this category, directly or in a group
    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.id == item_id)
            || self
                .groups
                .iter()
                .any(|group| group.items.iter().any(|item| item.id == item_id))
    }

    /// Direct items in display order
    pub fn sorted_items(&self) -> Vec<Item> {
        sort_by_order(&self.items)
    }

    /// Groups in display order
    pub fn sorted_groups(&self) -> Vec<Arc<Group>> {
        sort_by_order(&self.groups)
    }

    /// Number of items, direct and grouped
    pub fn count_items(&self) -> usize {
        self.items.len() + self.groups.iter().map(|group| group.items.len()).sum::<usize>()
    }
}

impl Entity for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Ordered for Category {
    fn order(&self) -> Option<i64> {
        self.order
    }

    fn set_order(&mut self, order: i64) {
        self.order = Some(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_group_adopts_group() {
        let category = Category::new("work", "Work")
            .with_group(Group::new("g1", "Tools", "elsewhere"))
            .with_group(Group::new("g2", "Docs", "work"));
        assert_eq!(category.groups[0].category_id, "work");
        assert_eq!(category.groups[1].order, Some(100));
    }

    #[test]
    fn test_contains_and_count() {
        let category = Category::new("work", "Work")
            .with_item(Item::new("a", "A", "u"))
            .with_group(Group::new("g1", "Tools", "work").with_item(Item::new("x", "X", "u")));
        assert!(category.contains_item("a"));
        assert!(category.contains_item("x"));
        assert!(!category.contains_item("g1"));
        assert_eq!(category.count_items(), 2);
    }
}
