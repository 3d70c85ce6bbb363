//! Group Entity
//!
//! Second-level container nested under exactly one category.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::item::Item;
use crate::order::{append_order, sort_by_order, Ordered, DEFAULT_ORDER_GAP};

/// A named list of items under one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Owning category
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Whether the group is shown expanded
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    #[serde(default)]
    pub items: Vec<Item>,
}

fn default_expanded() -> bool {
    true
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: category_id.into(),
            order: None,
            expanded: true,
            items: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Append an item after the current maximum order
    pub fn push_item(&mut self, mut item: Item) {
        item.order = Some(append_order(&self.items, DEFAULT_ORDER_GAP));
        self.items.push(item);
    }

    /// Builder form of [`Group::push_item`]
    pub fn with_item(mut self, item: Item) -> Self {
        self.push_item(item);
        self
    }

    /// Items in display order
    pub fn sorted_items(&self) -> Vec<Item> {
        sort_by_order(&self.items)
    }

    pub fn item_ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

impl Entity for Group {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Ordered for Group {
    fn order(&self) -> Option<i64> {
        self.order
    }

    fn set_order(&mut self, order: i64) {
        self.order = Some(order);
    }
}
