//! Order Model
//!
//! Ordering key semantics shared by every container in the tree: sorting,
//! dense re-stamping, rebalancing detection and neighbor-based insertion keys.

use std::sync::Arc;

/// Spacing between consecutive keys after a restamp
pub const DEFAULT_ORDER_GAP: i64 = 100;

/// Smallest adjacent gap that still admits a distinct integer midpoint
pub const DEFAULT_MIN_GAP: i64 = 2;

/// A node ranked by an optional integer key within its container
pub trait Ordered: Clone {
    fn order(&self) -> Option<i64>;

    fn set_order(&mut self, order: i64);

    /// Key used for sorting; a missing key ranks as 0
    fn order_key(&self) -> i64 {
        self.order().unwrap_or(0)
    }
}

// Copy-on-write: a shared node is only cloned when its key actually changes.
impl<T: Ordered> Ordered for Arc<T> {
    fn order(&self) -> Option<i64> {
        (**self).order()
    }

    fn set_order(&mut self, order: i64) {
        if self.order() != Some(order) {
            Arc::make_mut(self).set_order(order);
        }
    }
}

/// Stable ascending sort on the order key
pub fn sort_by_order<T: Ordered>(nodes: &[T]) -> Vec<T> {
    let mut sorted = nodes.to_vec();
    sorted.sort_by_key(Ordered::order_key);
    sorted
}

/// Assign `start + index * gap`, keeping the current sequence
pub fn restamp<T: Ordered>(nodes: &[T], start: i64, gap: i64) -> Vec<T> {
    restamp_owned(nodes.to_vec(), start, gap)
}

pub(crate) fn restamp_owned<T: Ordered>(mut nodes: Vec<T>, start: i64, gap: i64) -> Vec<T> {
    let mut next = start;
    for node in nodes.iter_mut() {
        node.set_order(next);
        next = next.saturating_add(gap);
    }
    nodes
}

/// True if two keys collide or any adjacent gap is below `min_gap`.
/// Gaps are measured in `i128` so extreme stored keys cannot overflow.
pub fn needs_rebalancing<T: Ordered>(nodes: &[T], min_gap: i64) -> bool {
    let mut keys: Vec<i64> = nodes.iter().map(Ordered::order_key).collect();
    keys.sort_unstable();
    keys.windows(2)
        .any(|pair| pair[0] == pair[1] || (pair[1] as i128) - (pair[0] as i128) < min_gap as i128)
}

/// True if the stored sequence already matches the sorted sequence
pub fn is_in_order<T: Ordered>(nodes: &[T]) -> bool {
    nodes
        .windows(2)
        .all(|pair| pair[0].order_key() <= pair[1].order_key())
}

/// Key for an insert between two known neighbors without restamping.
///
/// Falls back to `fallback` when neither neighbor exists. The midpoint may
/// equal `prev` once the gap is exhausted; check [`needs_rebalancing`].
/// Keys past either end of the `i64` range saturate.
pub fn insertion_order<T: Ordered>(prev: Option<&T>, next: Option<&T>, fallback: i64, gap: i64) -> i64 {
    match (prev, next) {
        (None, Some(next)) => next.order_key().saturating_sub(gap),
        (Some(prev), None) => prev.order_key().saturating_add(gap),
        (Some(prev), Some(next)) => {
            let (low, high) = (prev.order_key() as i128, next.order_key() as i128);
            // floor of the mean of two i64 values always fits in i64
            (low + (high - low).div_euclid(2)) as i64
        }
        (None, None) => fallback,
    }
}

/// Key for a node appended after the current maximum
pub fn append_order<T: Ordered>(nodes: &[T], gap: i64) -> i64 {
    nodes
        .iter()
        .map(Ordered::order_key)
        .max()
        .map_or(0, |max| max.saturating_add(gap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Group, Item};

    fn item(id: &str, order: Option<i64>) -> Item {
        let mut item = Item::new(id, id, "https://example.com");
        item.order = order;
        item
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    fn orders(items: &[Item]) -> Vec<Option<i64>> {
        items.iter().map(|item| item.order).collect()
    }

    #[test]
    fn test_sort_is_stable_and_treats_missing_as_zero() {
        let items = vec![
            item("a", Some(200)),
            item("b", None),
            item("c", Some(0)),
            item("d", Some(100)),
        ];
        let sorted = sort_by_order(&items);
        assert_eq!(ids(&sorted), vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_restamp_with_start_and_gap() {
        let items = vec![item("a", Some(7)), item("b", Some(3))];
        let stamped = restamp(&items, 0, DEFAULT_ORDER_GAP);
        assert_eq!(ids(&stamped), vec!["a", "b"]);
        assert_eq!(orders(&stamped), vec![Some(0), Some(100)]);

        let offset = restamp(&items, 1000, 10);
        assert_eq!(orders(&offset), vec![Some(1000), Some(1010)]);
    }

    #[test]
    fn test_restamp_is_idempotent() {
        let items = vec![item("a", Some(5)), item("b", None), item("c", Some(5))];
        let once = restamp(&items, 0, DEFAULT_ORDER_GAP);
        let twice = restamp(&once, 0, DEFAULT_ORDER_GAP);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_colliding_keys_need_rebalancing() {
        let items = vec![item("a", Some(50)), item("b", Some(50))];
        assert!(needs_rebalancing(&items, DEFAULT_MIN_GAP));

        let fixed = restamp(&sort_by_order(&items), 0, DEFAULT_ORDER_GAP);
        assert_eq!(ids(&fixed), vec!["a", "b"]);
        assert_eq!(orders(&fixed), vec![Some(0), Some(100)]);
        assert!(!needs_rebalancing(&fixed, DEFAULT_MIN_GAP));
    }

    #[test]
    fn test_close_keys_need_rebalancing() {
        let items = vec![item("a", Some(0)), item("b", Some(1)), item("c", Some(100))];
        assert!(needs_rebalancing(&items, DEFAULT_MIN_GAP));
        assert!(!needs_rebalancing(&items, 1));
        assert!(!needs_rebalancing::<Item>(&[], DEFAULT_MIN_GAP));
    }

    #[test]
    fn test_insertion_order_cases() {
        let prev = item("p", Some(100));
        let next = item("n", Some(200));
        assert_eq!(insertion_order(None, Some(&next), -1, DEFAULT_ORDER_GAP), 100);
        assert_eq!(insertion_order(Some(&prev), None, -1, DEFAULT_ORDER_GAP), 200);
        assert_eq!(insertion_order(Some(&prev), Some(&next), -1, DEFAULT_ORDER_GAP), 150);
        assert_eq!(insertion_order::<Item>(None, None, 42, DEFAULT_ORDER_GAP), 42);

        let tight = item("t", Some(101));
        assert_eq!(insertion_order(Some(&prev), Some(&tight), 0, DEFAULT_ORDER_GAP), 100);
    }

    #[test]
    fn test_append_order() {
        assert_eq!(append_order::<Item>(&[], DEFAULT_ORDER_GAP), 0);
        let items = vec![item("a", Some(300)), item("b", Some(100))];
        assert_eq!(append_order(&items, DEFAULT_ORDER_GAP), 400);
    }

    #[test]
    fn test_extreme_keys_do_not_overflow() {
        let items = vec![item("low", Some(i64::MIN)), item("high", Some(i64::MAX))];
        assert!(!needs_rebalancing(&items, DEFAULT_MIN_GAP));
        assert!(is_in_order(&items));

        let crowded = vec![item("a", Some(i64::MAX - 1)), item("b", Some(i64::MAX))];
        assert!(needs_rebalancing(&crowded, DEFAULT_MIN_GAP));

        let (low, high) = (&items[0], &items[1]);
        assert_eq!(insertion_order(Some(low), Some(high), 0, DEFAULT_ORDER_GAP), -1);
        assert_eq!(insertion_order(None, Some(low), 0, DEFAULT_ORDER_GAP), i64::MIN);
        assert_eq!(insertion_order(Some(high), None, 0, DEFAULT_ORDER_GAP), i64::MAX);
        assert_eq!(append_order(&items, DEFAULT_ORDER_GAP), i64::MAX);
        assert_eq!(orders(&restamp(&items, i64::MAX - 10, DEFAULT_ORDER_GAP)), vec![Some(i64::MAX - 10), Some(i64::MAX)]);
    }

    #[test]
    fn test_arc_restamp_only_clones_changed_nodes() {
        let groups = vec![
            Arc::new(Group::new("g1", "One", "c").with_order(0)),
            Arc::new(Group::new("g2", "Two", "c").with_order(7)),
        ];
        let stamped = restamp(&groups, 0, DEFAULT_ORDER_GAP);
        assert!(Arc::ptr_eq(&groups[0], &stamped[0]));
        assert!(!Arc::ptr_eq(&groups[1], &stamped[1]));
        assert_eq!(stamped[1].order, Some(100));
        assert_eq!(groups[1].order, Some(7));
    }
}
