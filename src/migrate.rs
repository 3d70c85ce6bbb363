//! Migration and Compaction
//!
//! One-time upgrade of snapshots whose groups or items lack an order key,
//! and the rebalancing pass that restamps crowded or colliding containers.

use std::sync::Arc;

use crate::domain::{Category, Group, Item, Tree};
use crate::order::{is_in_order, needs_rebalancing, restamp_owned, sort_by_order, Ordered, DEFAULT_ORDER_GAP};

/// True if any group or item is missing its order key
pub fn needs_migration(tree: &Tree) -> bool {
    tree.categories.iter().any(|category| {
        missing_any(&category.items)
            || category
                .groups
                .iter()
                .any(|group| group.order.is_none() || missing_any(&group.items))
    })
}

/// Assign `index * DEFAULT_ORDER_GAP` to every keyless group and item
pub fn migrate(tree: &Tree) -> Tree {
    migrate_with_gap(tree, DEFAULT_ORDER_GAP)
}

/// Assign `index * gap` to every keyless group and item, keeping array order
/// and leaving keyed nodes alone. Idempotent.
pub fn migrate_with_gap(tree: &Tree, gap: i64) -> Tree {
    let mut touched = 0usize;
    let categories = tree
        .categories
        .iter()
        .map(|category| {
            let items = fill_missing(&category.items, gap);
            let mut groups_changed = false;
            let groups: Vec<Arc<Group>> = category
                .groups
                .iter()
                .enumerate()
                .map(|(index, group)| {
                    let items = fill_missing(&group.items, gap);
                    if group.order.is_some() && items.is_none() {
                        return Arc::clone(group);
                    }
                    groups_changed = true;
                    Arc::new(Group {
                        order: group.order.or(Some((index as i64).saturating_mul(gap))),
                        items: items.unwrap_or_else(|| group.items.clone()),
                        ..Group::clone(group)
                    })
                })
                .collect();

            if items.is_none() && !groups_changed {
                return Arc::clone(category);
            }
            touched += 1;
            Arc::new(Category {
                id: category.id.clone(),
                name: category.name.clone(),
                order: category.order,
                items: items.unwrap_or_else(|| category.items.clone()),
                groups,
            })
        })
        .collect();

    if touched > 0 {
        tracing::info!(categories = touched, "migrated order keys");
    }
    Tree { categories }
}

fn missing_any(items: &[Item]) -> bool {
    items.iter().any(|item| item.order.is_none())
}

fn fill_missing(items: &[Item], gap: i64) -> Option<Vec<Item>> {
    if !missing_any(items) {
        return None;
    }
    Some(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| Item {
                order: item.order.or(Some((index as i64).saturating_mul(gap))),
                ..item.clone()
            })
            .collect(),
    )
}

/// True if any container has colliding or crowded keys, or is stored out of order
pub fn needs_compaction(tree: &Tree, min_gap: i64) -> bool {
    crowded(&tree.categories, min_gap)
        || tree.categories.iter().any(|category| {
            crowded(&category.items, min_gap)
                || crowded(&category.groups, min_gap)
                || category.groups.iter().any(|group| crowded(&group.items, min_gap))
        })
}

/// Restamp every crowded container in display order; others stay shared
pub fn compact(tree: &Tree, gap: i64, min_gap: i64) -> Tree {
    let mut restamped = 0usize;
    let mut settle = |nodes_crowded: bool| {
        if nodes_crowded {
            restamped += 1;
        }
        nodes_crowded
    };

    let categories: Vec<Arc<Category>> = tree
        .categories
        .iter()
        .map(|category| {
            let items_crowded = settle(crowded(&category.items, min_gap));
            let mut groups: Vec<Arc<Group>> = category
                .groups
                .iter()
                .map(|group| {
                    if settle(crowded(&group.items, min_gap)) {
                        Arc::new(Group {
                            items: restamp_owned(sort_by_order(&group.items), 0, gap),
                            ..Group::clone(group)
                        })
                    } else {
                        Arc::clone(group)
                    }
                })
                .collect();
            let groups_changed = groups
                .iter()
                .zip(&category.groups)
                .any(|(next, prev)| !Arc::ptr_eq(next, prev));
            let group_list_crowded = settle(crowded(&groups, min_gap));
            if group_list_crowded {
                groups = restamp_owned(sort_by_order(&groups), 0, gap);
            }

            if !items_crowded && !groups_changed && !group_list_crowded {
                return Arc::clone(category);
            }
            Arc::new(Category {
                id: category.id.clone(),
                name: category.name.clone(),
                order: category.order,
                items: if items_crowded {
                    restamp_owned(sort_by_order(&category.items), 0, gap)
                } else {
                    category.items.clone()
                },
                groups,
            })
        })
        .collect();

    let categories = if settle(crowded(&categories, min_gap)) {
        restamp_owned(sort_by_order(&categories), 0, gap)
    } else {
        categories
    };

    if restamped > 0 {
        tracing::info!(containers = restamped, "compacted order keys");
    }
    Tree { categories }
}

fn crowded<T: Ordered>(nodes: &[T], min_gap: i64) -> bool {
    needs_rebalancing(nodes, min_gap) || !is_in_order(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::DEFAULT_MIN_GAP;

    fn bare(id: &str) -> Item {
        Item::new(id, id, "u")
    }

    fn legacy_tree() -> Tree {
        let mut group = Group::new("g", "G", "work");
        group.items = vec![bare("x"), bare("y").with_order(500)];
        let category = Category {
            items: vec![bare("a"), bare("b")],
            groups: vec![Arc::new(group)],
            ..Category::new("work", "Work")
        };
        Tree::new(vec![category, Category::new("home", "Home")])
    }

    #[test]
    fn test_migrate_fills_missing_keys_only() {
        let tree = legacy_tree();
        assert!(needs_migration(&tree));

        let migrated = migrate(&tree);
        assert!(!needs_migration(&migrated));
        let work = &migrated.categories[0];
        assert_eq!(work.items[0].order, Some(0));
        assert_eq!(work.items[1].order, Some(100));
        assert_eq!(work.groups[0].order, Some(0));
        assert_eq!(work.groups[0].items[0].order, Some(0));
        assert_eq!(work.groups[0].items[1].order, Some(500));
        assert!(Arc::ptr_eq(&tree.categories[1], &migrated.categories[1]));
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let once = migrate(&legacy_tree());
        let twice = migrate(&once);
        assert_eq!(once, twice);
        assert!(Arc::ptr_eq(&once.categories[0], &twice.categories[0]));
    }

    #[test]
    fn test_compaction_restamps_colliding_siblings() {
        let category = Category {
            items: vec![bare("a").with_order(50), bare("b").with_order(50)],
            ..Category::new("work", "Work").with_order(0)
        };
        let tree = Tree::new(vec![category]);
        assert!(needs_compaction(&tree, DEFAULT_MIN_GAP));

        let compacted = compact(&tree, DEFAULT_ORDER_GAP, DEFAULT_MIN_GAP);
        let items = &compacted.categories[0].items;
        assert_eq!(items[0].id, "a");
        assert_eq!(items[0].order, Some(0));
        assert_eq!(items[1].id, "b");
        assert_eq!(items[1].order, Some(100));
        assert!(!needs_compaction(&compacted, DEFAULT_MIN_GAP));
    }

    #[test]
    fn test_compaction_sorts_storage_and_shares_clean_groups() {
        let mut messy = Group::new("messy", "M", "work").with_order(0);
        messy.items = vec![bare("late").with_order(300), bare("early").with_order(100)];
        let clean = Group::new("clean", "C", "work")
            .with_order(100)
            .with_item(bare("c1"))
            .with_item(bare("c2"));
        let category = Category {
            groups: vec![Arc::new(messy), Arc::new(clean)],
            ..Category::new("work", "Work").with_order(0)
        };
        let tree = Tree::new(vec![category]);

        let compacted = compact(&tree, DEFAULT_ORDER_GAP, DEFAULT_MIN_GAP);
        let groups = &compacted.categories[0].groups;
        assert_eq!(groups[0].item_ids(), vec!["early", "late"]);
        assert!(Arc::ptr_eq(&groups[1], &tree.categories[0].groups[1]));
        assert!(compacted.validate().is_ok());
    }

    #[test]
    fn test_extreme_keys_are_not_crowded() {
        let category = Category {
            items: vec![bare("low").with_order(i64::MIN), bare("high").with_order(i64::MAX)],
            ..Category::new("work", "Work").with_order(0)
        };
        let tree = Tree::new(vec![category]);
        assert!(!needs_compaction(&tree, DEFAULT_MIN_GAP));
        let compacted = compact(&tree, DEFAULT_ORDER_GAP, DEFAULT_MIN_GAP);
        assert!(Arc::ptr_eq(&tree.categories[0], &compacted.categories[0]));
    }

    #[test]
    fn test_clean_tree_is_untouched() {
        let tree = Tree::new(vec![
            Category::new("work", "Work").with_order(0).with_item(bare("a")),
            Category::new("home", "Home").with_order(100),
        ]);
        assert!(!needs_compaction(&tree, DEFAULT_MIN_GAP));
        let compacted = compact(&tree, DEFAULT_ORDER_GAP, DEFAULT_MIN_GAP);
        assert!(Arc::ptr_eq(&tree.categories[0], &compacted.categories[0]));
    }
}
