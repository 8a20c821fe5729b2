//! Filter/order reduction ahead of requirement derivation
//!
//! The output is only meaningful for deciding which index a query needs. It
//! drops filters and orders the executor still has to apply, so it must not
//! be fed back into execution.

use std::collections::HashSet;

use crate::index::Direction;

use super::ast::{Filter, FilterOp, SortSpec, KEY_PROPERTY};

/// A single-valued `IN` is an `EQUAL` in disguise.
fn rewrite_single_in(mut filter: Filter) -> Filter {
    if filter.op == FilterOp::In && filter.properties.len() == 1 {
        filter.op = FilterOp::Equal;
    }
    filter
}

/// Reduces filters and orders to a canonical, redundancy-free form.
///
/// Expects filters that already passed arity validation. `exists` lists
/// properties that must be present (projections and group-by); those not
/// otherwise constrained become synthesized `EXISTS` filters.
pub fn normalize(
    filters: &[Filter],
    orders: &[SortSpec],
    exists: &[String],
) -> (Vec<Filter>, Vec<SortSpec>) {
    let filters: Vec<Filter> = filters.iter().cloned().map(rewrite_single_in).collect();

    let mut eq_properties: HashSet<String> = HashSet::new();
    let mut inequality_properties: HashSet<String> = HashSet::new();
    for f in &filters {
        if f.is_equality() {
            eq_properties.insert(f.property().to_string());
        } else if f.is_inequality() {
            inequality_properties.insert(f.property().to_string());
        }
    }
    // A ranged property is not fixed by an equality on it.
    eq_properties.retain(|p| !inequality_properties.contains(p));

    // Sorting on a fixed value is moot, and only the first order on a
    // property counts.
    let mut remove_set = eq_properties.clone();
    let mut new_orders = Vec::with_capacity(orders.len());
    for order in orders {
        if remove_set.insert(order.property.clone()) {
            new_orders.push(order.clone());
        }
    }

    remove_set.extend(inequality_properties.iter().cloned());

    let mut new_filters = Vec::with_capacity(filters.len() + exists.len());
    for f in filters {
        if !f.is_exists() {
            new_filters.push(f);
            continue;
        }
        if remove_set.insert(f.property().to_string()) {
            new_filters.push(f);
        }
    }
    for property in exists {
        if remove_set.insert(property.clone()) {
            new_filters.push(Filter::exists(property.clone()));
        }
    }

    if eq_properties.contains(KEY_PROPERTY) {
        // At most one entity matches.
        new_orders.clear();
    } else if let Some(pos) = new_orders.iter().position(|o| o.property == KEY_PROPERTY) {
        // Keys are unique; nothing sorts after them.
        new_orders.truncate(pos + 1);
    }

    (new_filters, new_orders)
}

/// Normalizes, then removes what the storage engine serves without a
/// declared index: a trailing ascending key order and, absent a range on
/// another property, the filters on the key itself.
pub fn remove_natively_supported(
    filters: &[Filter],
    orders: &[SortSpec],
    exists: &[String],
) -> (Vec<Filter>, Vec<SortSpec>) {
    let (mut filters, mut orders) = normalize(filters, orders, exists);

    if filters.iter().any(Filter::is_exists) {
        return (filters, orders);
    }

    let trailing_key = orders
        .last()
        .filter(|o| o.property == KEY_PROPERTY)
        .map(|o| o.direction);

    let has_key_desc_order = match trailing_key {
        Some(Direction::Asc) => {
            orders.pop();
            false
        }
        Some(Direction::Desc) => true,
        None => false,
    };

    if !has_key_desc_order {
        let ranged_elsewhere = filters
            .iter()
            .any(|f| f.is_inequality() && f.property() != KEY_PROPERTY);
        if !ranged_elsewhere {
            filters.retain(|f| f.property() != KEY_PROPERTY);
        }
    }

    (filters, orders)
}
