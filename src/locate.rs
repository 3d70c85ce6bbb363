//! Location Resolver
//!
//! Finds the container holding a dragged node and the container/index a drop
//! target points at. Resolution is scoped to one category; moves never cross
//! categories. Indices are display positions, i.e. positions in the
//! container's order-sorted sequence.

use drag_session::DropTarget;

use crate::domain::{Category, ContainerId, Entity, Group, Item, Tree};
use crate::order::Ordered;

/// Container of an item: the category's direct list or one of its groups
#[derive(Debug, Clone, Copy)]
pub enum Location<'a> {
    Primary(&'a Category),
    Secondary(&'a Group),
}

impl<'a> Location<'a> {
    pub fn items(&self) -> &'a [Item] {
        match *self {
            Location::Primary(category) => &category.items,
            Location::Secondary(group) => &group.items,
        }
    }

    pub fn container_id(&self) -> ContainerId<'a> {
        match *self {
            Location::Primary(category) => ContainerId::CategoryItems(&category.id),
            Location::Secondary(group) => ContainerId::GroupItems(&group.id),
        }
    }

    /// True if both locations name the same container
    pub fn same_container(&self, other: &Location<'_>) -> bool {
        self.container_id() == other.container_id()
    }
}

/// A container plus a display position inside it
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub location: Location<'a>,
    pub index: usize,
}

/// Source and target of an item drag
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMove<'a> {
    pub source: Placement<'a>,
    pub target: Placement<'a>,
}

/// Source and target display positions inside one ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMove {
    pub from: usize,
    pub to: usize,
}

/// Display position of `id` among `nodes`
pub fn display_position<T: Entity + Ordered>(nodes: &[T], id: &str) -> Option<usize> {
    let mut sorted: Vec<&T> = nodes.iter().collect();
    sorted.sort_by_key(|node| node.order_key());
    sorted.iter().position(|node| node.id() == id)
}

/// Where the item currently lives. Item ids are unique, so at most one container matches.
pub fn locate_item<'a>(category: &'a Category, item_id: &str) -> Option<Placement<'a>> {
    if let Some(index) = display_position(&category.items, item_id) {
        return Some(Placement {
            location: Location::Primary(category),
            index,
        });
    }
    category.groups.iter().find_map(|group| {
        display_position(&group.items, item_id).map(|index| Placement {
            location: Location::Secondary(&**group),
            index,
        })
    })
}

/// Where an item dropped on `over` should go. A zone naming another
/// category is looked up as the node whose id has the `-empty` suffix.
pub fn resolve_item_target<'a>(category: &'a Category, over: &DropTarget) -> Option<Placement<'a>> {
    if matches!(over, DropTarget::EmptyList(category_id) if *category_id == category.id) {
        return Some(Placement {
            location: Location::Primary(category),
            index: 0,
        });
    }
    let wire_id = over.to_wire();
    let over_id = wire_id.as_str();

    if let Some(index) = display_position(&category.items, over_id) {
        return Some(Placement {
            location: Location::Primary(category),
            index,
        });
    }
    for group in &category.groups {
        if let Some(index) = display_position(&group.items, over_id) {
            return Some(Placement {
                location: Location::Secondary(&**group),
                index,
            });
        }
    }
    // Drop on a group header lands at the end of that group
    category
        .group(over_id)
        .map(|group| Placement {
            location: Location::Secondary(&**group),
            index: group.items.len(),
        })
}

/// Resolve an item drag inside `category`; `None` means no-op
pub fn resolve_item_move<'a>(
    category: &'a Category,
    active_id: &str,
    over: &DropTarget,
) -> Option<ResolvedMove<'a>> {
    if over.to_wire() == active_id {
        return None;
    }
    let source = locate_item(category, active_id)?;
    let target = resolve_item_target(category, over)?;
    Some(ResolvedMove { source, target })
}

/// Display position of the group a group drag is over. Dropping on an item
/// inside a group counts as dropping on that group.
pub fn resolve_group_target(category: &Category, over: &DropTarget) -> Option<usize> {
    let wire_id = over.to_wire();
    let over_id = wire_id.as_str();
    if let Some(index) = display_position(&category.groups, over_id) {
        return Some(index);
    }
    let owner = category
        .groups
        .iter()
        .find(|group| group.items.iter().any(|item| item.id == over_id))?;
    display_position(&category.groups, &owner.id)
}

/// Resolve a group drag inside `category`; `None` means no-op
pub fn resolve_group_move(category: &Category, active_id: &str, over: &DropTarget) -> Option<ListMove> {
    let from = display_position(&category.groups, active_id)?;
    let to = resolve_group_target(category, over)?;
    (from != to).then_some(ListMove { from, to })
}

/// Resolve a top-level category drag; `None` means no-op
pub fn resolve_category_move(tree: &Tree, active_id: &str, over_id: &str) -> Option<ListMove> {
    let from = display_position(&tree.categories, active_id)?;
    let to = display_position(&tree.categories, over_id)?;
    (from != to).then_some(ListMove { from, to })
}
