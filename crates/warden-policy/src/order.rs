//! Helpers shared by the partial orders in this crate.

use std::{cmp::Ordering, collections::BTreeSet};

/// Combine two independent dimensions of a product order.
///
/// Equal in one dimension defers to the other; otherwise both dimensions
/// must move in the same direction.
pub(crate) fn product_order(a: Option<Ordering>, b: Option<Ordering>) -> Option<Ordering> {
    match (a?, b?) {
        (Ordering::Equal, o) | (o, Ordering::Equal) => Some(o),
        (x, y) if x == y => Some(x),
        _ => None,
    }
}

/// Subset order on sets.
pub(crate) fn subset_order<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> Option<Ordering> {
    if a == b {
        Some(Ordering::Equal)
    } else if a.is_superset(b) {
        Some(Ordering::Greater)
    } else if a.is_subset(b) {
        Some(Ordering::Less)
    } else {
        None
    }
}

/// `Less` or `Equal`.
pub(crate) fn is_at_most(ordering: Option<Ordering>) -> bool {
    matches!(ordering, Some(Ordering::Less | Ordering::Equal))
}
