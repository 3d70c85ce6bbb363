//! Item Entity
//!
//! The leaf of the tree: a single navigable destination.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::order::Ordered;

/// A navigable destination owned by exactly one container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier across the whole tree
    pub id: String,
    pub name: String,
    pub url: String,
    /// Ranking key within the owning container (missing before migration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Creation time, epoch millis
    pub created_at: i64,
    /// Last edit time, epoch millis
    pub updated_at: i64,
}

impl Item {
    /// Create a new item stamped with the current time and no order key
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            order: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

impl Entity for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Ordered for Item {
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
    fn test_item_creation() {
        let item = Item::new("i1", "Docs", "https://docs.rs");
        assert_eq!(item.id(), "i1");
        assert_eq!(item.url, "https://docs.rs");
        assert!(item.order.is_none());
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_item_serialization_keeps_missing_order() {
        let json = r#"{"id":"i1","name":"n","url":"u","createdAt":1,"updatedAt":2}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.order, None);
        assert_eq!(serde_json::to_string(&item).unwrap(), json);

        let keyed = item.with_order(300);
        let value = serde_json::to_value(&keyed).unwrap();
        assert_eq!(value["order"], 300);
    }
}
