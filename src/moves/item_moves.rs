//! Item move executor
//!
//! Runs one of the five item topologies against a single category and
//! returns the rebuilt category. Only the containers a move touches are
//! replaced; every other group is shared with the input.

use std::sync::Arc;

use crate::domain::{Category, ContainerId, Group, Item};
use crate::locate::{ListMove, Location, ResolvedMove};
use crate::order::{restamp_owned, sort_by_order};

use super::list_moves::reorder_list;
use super::notify::ReorderNotification;
use super::MoveTopology;

/// Pick the topology from the source/target container pair
pub fn classify(source: &Location<'_>, target: &Location<'_>) -> MoveTopology {
    match (source, target) {
        (Location::Primary(_), Location::Primary(_)) => MoveTopology::ReorderCategoryItems,
        (Location::Primary(_), Location::Secondary(_)) => MoveTopology::PromoteOut,
        (Location::Secondary(_), Location::Primary(_)) => MoveTopology::PromoteIn,
        (Location::Secondary(from), Location::Secondary(to)) if from.id == to.id => {
            MoveTopology::ReorderGroupItems
        }
        (Location::Secondary(_), Location::Secondary(_)) => MoveTopology::MoveBetweenGroups,
    }
}

pub(crate) struct ItemMove {
    pub category: Category,
    pub topology: MoveTopology,
    pub notifications: Vec<ReorderNotification>,
}

pub(crate) fn move_item(category: &Category, resolved: &ResolvedMove<'_>, gap: i64) -> ItemMove {
    let source = resolved.source;
    let target = resolved.target;
    let topology = classify(&source.location, &target.location);

    let updates: Vec<(ContainerId<'_>, Vec<Item>)> = match topology {
        MoveTopology::ReorderCategoryItems | MoveTopology::ReorderGroupItems => {
            let mv = ListMove {
                from: source.index,
                to: target.index,
            };
            vec![(source.location.container_id(), reorder_list(source.location.items(), mv, gap))]
        }
        MoveTopology::PromoteOut | MoveTopology::PromoteIn | MoveTopology::MoveBetweenGroups => {
            let mut remaining = sort_by_order(source.location.items());
            let moved = remaining.remove(source.index);
            let remaining = restamp_owned(remaining, 0, gap);

            let mut filled = sort_by_order(target.location.items());
            let index = target.index.min(filled.len());
            filled.insert(index, moved);
            let filled = restamp_owned(filled, 0, gap);

            vec![
                (source.location.container_id(), remaining),
                (target.location.container_id(), filled),
            ]
        }
    };

    let notifications = updates
        .iter()
        .map(|(container, items)| ReorderNotification::for_items(*container, items))
        .collect();

    ItemMove {
        category: rebuild(category, updates),
        topology,
        notifications,
    }
}

fn take<'a>(updates: &mut Vec<(ContainerId<'a>, Vec<Item>)>, container: ContainerId<'a>) -> Option<Vec<Item>> {
    let index = updates.iter().position(|(id, _)| *id == container)?;
    Some(updates.swap_remove(index).1)
}

/// New category with the updated containers swapped in
fn rebuild<'a>(category: &'a Category, mut updates: Vec<(ContainerId<'a>, Vec<Item>)>) -> Category {
    let items = take(&mut updates, ContainerId::CategoryItems(&category.id))
        .unwrap_or_else(|| category.items.clone());
    let groups = category
        .groups
        .iter()
        .map(|group| match take(&mut updates, ContainerId::GroupItems(&group.id)) {
            Some(items) => Arc::new(Group {
                items,
                ..Group::clone(group)
            }),
            None => Arc::clone(group),
        })
        .collect();

    Category {
        id: category.id.clone(),
        name: category.name.clone(),
        order: category.order,
        items,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::resolve_item_move;
    use drag_session::DropTarget;

    fn category() -> Category {
        Category::new("work", "Work")
            .with_item(Item::new("a", "A", "u"))
            .with_group(Group::new("g1", "One", "work").with_item(Item::new("p", "P", "u")))
            .with_group(Group::new("g2", "Two", "work").with_item(Item::new("r", "R", "u")))
    }

    fn topology_of(category: &Category, active: &str, over: DropTarget) -> MoveTopology {
        let resolved = resolve_item_move(category, active, &over).unwrap();
        classify(&resolved.source.location, &resolved.target.location)
    }

    #[test]
    fn test_classify_all_five_topologies() {
        let category = category().with_item(Item::new("b", "B", "u"));
        assert_eq!(
            topology_of(&category, "a", DropTarget::node("b")),
            MoveTopology::ReorderCategoryItems
        );
        assert_eq!(topology_of(&category, "a", DropTarget::node("p")), MoveTopology::PromoteOut);
        assert_eq!(
            topology_of(&category, "p", DropTarget::empty_list("work")),
            MoveTopology::PromoteIn
        );
        assert_eq!(
            topology_of(&category, "p", DropTarget::node("g1")),
            MoveTopology::ReorderGroupItems
        );
        assert_eq!(
            topology_of(&category, "p", DropTarget::node("r")),
            MoveTopology::MoveBetweenGroups
        );
    }

    #[test]
    fn test_rebuilt_group_keeps_its_fields() {
        let collapsed = Group {
            expanded: false,
            ..Group::new("g3", "Three", "work").with_item(Item::new("s", "S", "u"))
        };
        let category = category().with_group(collapsed);
        let resolved = resolve_item_move(&category, "a", &DropTarget::node("s")).unwrap();
        let result = move_item(&category, &resolved, 100);
        let rebuilt = result.category.group("g3").unwrap();
        assert!(!rebuilt.expanded);
        assert_eq!(rebuilt.name, "Three");
        assert_eq!(rebuilt.order, Some(200));
        assert_eq!(rebuilt.item_ids(), vec!["a", "s"]);
    }

    #[test]
    fn test_untouched_group_is_shared() {
        let category = category();
        let resolved = resolve_item_move(&category, "a", &DropTarget::node("p")).unwrap();
        let result = move_item(&category, &resolved, 100);
        assert_eq!(result.topology, MoveTopology::PromoteOut);
        assert!(result.category.items.is_empty());
        assert_eq!(result.category.groups[0].item_ids(), vec!["a", "p"]);
        assert!(Arc::ptr_eq(&category.groups[1], &result.category.groups[1]));
        assert_eq!(result.notifications.len(), 2);
    }
}
