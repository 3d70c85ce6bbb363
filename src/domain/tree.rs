//! Tree Snapshot
//!
//! An ordered forest of categories. Snapshots are immutable values: every
//! operation returns a new tree that shares untouched categories and groups
//! with its input, so callers can diff snapshots with `Arc::ptr_eq`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use drag_session::EMPTY_LIST_SUFFIX;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::entity::{DomainError, DomainResult};
use super::group::Group;
use super::item::Item;
use crate::order::Ordered;

/// Identifies one item container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId<'a> {
    /// Direct item list of a category
    CategoryItems(&'a str),
    /// Item list of a group
    GroupItems(&'a str),
}

impl std::fmt::Display for ContainerId<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerId::CategoryItems(id) => write!(f, "category {}", id),
            ContainerId::GroupItems(id) => write!(f, "group {}", id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub categories: Vec<Arc<Category>>,
}

impl Tree {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: categories.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_json(json: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DomainResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, category_id: &str) -> Option<&Arc<Category>> {
        self.categories.iter().find(|category| category.id == category_id)
    }

    /// Category holding the item, directly or through one of its groups
    pub fn category_of_item(&self, item_id: &str) -> Option<&Arc<Category>> {
        self.categories.iter().find(|category| category.contains_item(item_id))
    }

    pub fn category_of_group(&self, group_id: &str) -> Option<&Arc<Category>> {
        self.categories
            .iter()
            .find(|category| category.group(group_id).is_some())
    }

    pub fn group(&self, group_id: &str) -> Option<&Arc<Group>> {
        self.categories
            .iter()
            .find_map(|category| category.group(group_id))
    }

    pub fn count_items(&self) -> usize {
        self.categories.iter().map(|category| category.count_items()).sum()
    }

    /// Every item container in the tree, categories first then their groups
    pub fn item_lists(&self) -> Vec<(ContainerId<'_>, &[Item])> {
        let mut lists = Vec::new();
        for category in &self.categories {
            lists.push((ContainerId::CategoryItems(category.id.as_str()), category.items.as_slice()));
            for group in &category.groups {
                lists.push((ContainerId::GroupItems(group.id.as_str()), group.items.as_slice()));
            }
        }
        lists
    }

    /// All item ids in container order
    pub fn item_ids(&self) -> Vec<String> {
        self.item_lists()
            .into_iter()
            .flat_map(|(_, items)| items.iter().map(|item| item.id.clone()))
            .collect()
    }

    /// New tree with the category of the same id replaced; siblings are shared
    pub fn with_category(&self, category: Category) -> Tree {
        let replacement = Arc::new(category);
        Tree {
            categories: self
                .categories
                .iter()
                .map(|existing| {
                    if existing.id == replacement.id {
                        Arc::clone(&replacement)
                    } else {
                        Arc::clone(existing)
                    }
                })
                .collect(),
        }
    }

    /// Check the structural invariants: unique item ids held by exactly one
    /// container, unique group ids owned by a matching category, and strictly
    /// ascending order keys in every item and group container. Node ids that
    /// read as a category's empty-list zone (`<category>-empty`) are rejected.
    pub fn validate(&self) -> DomainResult<()> {
        self.check_zone_ids()?;

        let mut seen_items: HashMap<&str, ContainerId<'_>> = HashMap::new();
        for (container, items) in self.item_lists() {
            for item in items {
                if let Some(first) = seen_items.insert(item.id.as_str(), container) {
                    return Err(DomainError::Conflict(format!(
                        "item {} appears in both {} and {}",
                        item.id, first, container
                    )));
                }
            }
            check_ascending(items, &container.to_string())?;
        }

        let mut seen_groups: HashMap<&str, &str> = HashMap::new();
        for category in &self.categories {
            for group in &category.groups {
                if group.category_id != category.id {
                    return Err(DomainError::Conflict(format!(
                        "group {} is listed under category {} but names {}",
                        group.id, category.id, group.category_id
                    )));
                }
                if let Some(first) = seen_groups.insert(group.id.as_str(), category.id.as_str()) {
                    return Err(DomainError::Conflict(format!(
                        "group {} appears under both {} and {}",
                        group.id, first, category.id
                    )));
                }
            }
            check_ascending(&category.groups, &format!("groups of category {}", category.id))?;
        }
        Ok(())
    }
}

impl Tree {
    fn check_zone_ids(&self) -> DomainResult<()> {
        let category_ids: HashSet<&str> = self.categories.iter().map(|c| c.id.as_str()).collect();
        let item_ids = self
            .item_lists()
            .into_iter()
            .flat_map(|(_, items)| items.iter().map(|item| item.id.as_str()));
        let group_ids = self
            .categories
            .iter()
            .flat_map(|category| category.groups.iter().map(|group| group.id.as_str()));
        for id in item_ids.chain(group_ids) {
            if let Some(prefix) = id.strip_suffix(EMPTY_LIST_SUFFIX) {
                if category_ids.contains(prefix) {
                    return Err(DomainError::Conflict(format!(
                        "node id {} collides with the empty-list zone of category {}",
                        id, prefix
                    )));
                }
            }
        }
        Ok(())
    }
}

fn check_ascending<T: Ordered>(nodes: &[T], container: &str) -> DomainResult<()> {
    match nodes
        .windows(2)
        .position(|pair| pair[0].order_key() >= pair[1].order_key())
    {
        Some(index) => Err(DomainError::Conflict(format!(
            "order keys of {} are not strictly ascending at position {}",
            container,
            index + 1
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        Tree::new(vec![
            Category::new("work", "Work")
                .with_item(Item::new("a", "A", "https://a"))
                .with_group(Group::new("tools", "Tools", "work").with_item(Item::new("x", "X", "https://x"))),
            Category::new("home", "Home").with_item(Item::new("h", "H", "https://h")),
        ])
    }

    #[test]
    fn test_lookup_and_count() {
        let tree = sample();
        assert_eq!(tree.count_items(), 3);
        assert_eq!(tree.category_of_item("x").unwrap().id, "work");
        assert_eq!(tree.category_of_group("tools").unwrap().id, "work");
        assert!(tree.category_of_item("missing").is_none());
        assert_eq!(tree.item_ids(), vec!["a", "x", "h"]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let tree = sample();
        let json = tree.to_json().unwrap();
        let back = Tree::from_json(&json).unwrap();
        assert_eq!(back, tree);
        assert!(json.contains("\"categoryId\":\"work\""));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn test_with_category_shares_siblings() {
        let tree = sample();
        let renamed = Category {
            name: "Job".to_string(),
            ..(*tree.categories[0]).clone()
        };
        let next = tree.with_category(renamed);
        assert_eq!(next.categories[0].name, "Job");
        assert!(Arc::ptr_eq(&tree.categories[1], &next.categories[1]));
        assert_eq!(tree.categories[0].name, "Work");
    }

    #[test]
    fn test_validate_rejects_duplicate_item() {
        let mut category = Category::new("work", "Work").with_item(Item::new("a", "A", "u"));
        category.push_group(Group::new("g", "G", "work").with_item(Item::new("a", "A", "u")));
        let err = Tree::new(vec![category]).validate().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn test_validate_rejects_foreign_group() {
        let mut category = Category::new("work", "Work");
        category.groups.push(Arc::new(Group::new("g", "G", "home").with_order(0)));
        assert!(Tree::new(vec![category]).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zone_like_ids() {
        let clash = Tree::new(vec![
            Category::new("work", "Work"),
            Category::new("home", "Home").with_item(Item::new("work-empty", "W", "u")),
        ]);
        assert!(matches!(clash.validate(), Err(DomainError::Conflict(_))));

        let group_clash = Tree::new(vec![Category::new("work", "Work").with_group(Group::new("work-empty", "G", "work"))]);
        assert!(group_clash.validate().is_err());

        let unrelated = Tree::new(vec![Category::new("work", "Work").with_item(Item::new("todo-empty", "T", "u"))]);
        assert!(unrelated.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_colliding_orders() {
        let category = Category {
            items: vec![
                Item::new("a", "A", "u").with_order(50),
                Item::new("b", "B", "u").with_order(50),
            ],
            ..Category::new("work", "Work")
        };
        assert!(Tree::new(vec![category]).validate().is_err());
    }
}
