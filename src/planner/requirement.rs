//! Composite index requirement derivation
//!
//! A requirement splits the needed index into:
//!
//! - prefix: properties fixed by equality filters, any column order
//! - postfix: trailing groups in fixed order (sort orders plus the single
//!   ranged property, then group-by existence, then other existence)
//!
//! Geospatial queries use a different composition: equality prefix plus a
//! single unordered group of geospatial columns.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::index::{Direction, PropertySpec};

use super::ast::{
    is_special_property, Filter, FilterOp, Query, KEY_PROPERTY,
    UNAPPLIED_LOG_TIMESTAMP_PROPERTY,
};
use super::errors::{PlannerError, PlannerResult};
use super::normalize::remove_natively_supported;

/// One trailing group of a required index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "group", content = "properties", rename_all = "lowercase")]
pub enum PostfixGroup {
    /// Columns that must appear in exactly this order
    Ordered(Vec<PropertySpec>),
    /// Columns that must appear as a contiguous run, in any order
    Unordered(BTreeSet<PropertySpec>),
}

impl PostfixGroup {
    pub fn len(&self) -> usize {
        match self {
            PostfixGroup::Ordered(props) => props.len(),
            PostfixGroup::Unordered(props) => props.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered trailing groups of a required index, most significant first
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Postfix {
    groups: Vec<PostfixGroup>,
}

impl Postfix {
    /// Orders, then group-by existence, then other existence
    pub fn standard(
        ordered: Vec<PropertySpec>,
        group_by: BTreeSet<PropertySpec>,
        unordered: BTreeSet<PropertySpec>,
    ) -> Self {
        Self {
            groups: vec![
                PostfixGroup::Ordered(ordered),
                PostfixGroup::Unordered(group_by),
                PostfixGroup::Unordered(unordered),
            ],
        }
    }

    pub fn geospatial(properties: BTreeSet<PropertySpec>) -> Self {
        Self {
            groups: vec![PostfixGroup::Unordered(properties)],
        }
    }

    /// A postfix made of one fixed column run
    pub fn ordered(properties: Vec<PropertySpec>) -> Self {
        Self {
            groups: vec![PostfixGroup::Ordered(properties)],
        }
    }

    pub fn groups(&self) -> &[PostfixGroup] {
        &self.groups
    }

    pub fn property_count(&self) -> usize {
        self.groups.iter().map(PostfixGroup::len).sum()
    }
}

/// Shape of the composite index a query needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// False when the storage engine serves the query without a declared index
    pub required: bool,
    pub kind: Option<String>,
    pub ancestor: bool,
    /// Properties constrained by equality
    pub prefix: BTreeSet<String>,
    pub postfix: Postfix,
}

impl Requirement {
    pub fn property_count(&self) -> usize {
        self.prefix.len() + self.postfix.property_count()
    }
}

/// Rejects filters that do not carry exactly one property. A multi-valued
/// `IN` must be expanded by the caller.
fn check_filter_arity(filters: &[Filter]) -> PlannerResult<()> {
    for f in filters {
        let count = f.properties.len();
        if f.op == FilterOp::In && count > 1 {
            return Err(PlannerError::multi_valued_in(f.property(), count));
        }
        if count != 1 {
            return Err(PlannerError::filter_arity(f.op.op_name(), count));
        }
    }
    Ok(())
}

/// Runs every invariant check of requirement derivation, so callers can
/// reject an invalid query before planning.
pub fn validate_query(query: &Query) -> PlannerResult<()> {
    composite_index_for_query(query).map(|_| ())
}

/// Derives the composite index a query needs.
pub fn composite_index_for_query(query: &Query) -> PlannerResult<Requirement> {
    check_filter_arity(&query.filters)?;
    if query.is_geospatial() {
        return composite_index_for_geo_query(query);
    }

    // Kindless queries are served without declared indexes.
    let mut required = query.kind.is_some();
    let kind = query.kind.clone();
    let ancestor = query.has_ancestor;

    let exists = query.exists_properties();
    let (filters, orders) = remove_natively_supported(&query.filters, &query.orders, &exists);

    let mut eq_filters: Vec<&Filter> = Vec::new();
    let mut ineq_filters: Vec<&Filter> = Vec::new();
    let mut exists_filters: Vec<&Filter> = Vec::new();
    for f in &filters {
        match f.op {
            FilterOp::Equal => eq_filters.push(f),
            FilterOp::LessThan
            | FilterOp::LessThanOrEqual
            | FilterOp::GreaterThan
            | FilterOp::GreaterThanOrEqual => ineq_filters.push(f),
            FilterOp::Exists => exists_filters.push(f),
            FilterOp::In => {
                return Err(PlannerError::multi_valued_in(f.property(), f.properties.len()))
            }
            FilterOp::ContainedInRegion => {
                return Err(PlannerError::geo_unsatisfiable(
                    "Geospatial filter reached ordinary requirement derivation",
                ))
            }
        }
    }

    if kind.is_some()
        && ineq_filters.is_empty()
        && exists_filters.is_empty()
        && orders.is_empty()
        && !eq_filters.iter().any(|f| is_special_property(f.property()))
    {
        // Equality-only lookups by kind are built in.
        required = false;
    }

    let mut ineq_property: Option<&str> = None;
    for f in &ineq_filters {
        let name = f.property();
        if name == UNAPPLIED_LOG_TIMESTAMP_PROPERTY {
            continue;
        }
        match ineq_property {
            None => ineq_property = Some(name),
            Some(existing) if existing != name => {
                return Err(PlannerError::multiple_inequality(existing, name));
            }
            Some(_) => {}
        }
    }

    let group_by: HashSet<&str> = query
        .group_by_property_names
        .iter()
        .map(String::as_str)
        .collect();

    let prefix: BTreeSet<String> = eq_filters
        .iter()
        .map(|f| f.property().to_string())
        .collect();

    let mut postfix_ordered: Vec<PropertySpec> = orders
        .iter()
        .map(|o| PropertySpec::with_direction(o.property.clone(), o.direction))
        .collect();

    let (postfix_group_by, postfix_unordered): (BTreeSet<PropertySpec>, BTreeSet<PropertySpec>) =
        exists_filters
            .iter()
            .map(|f| PropertySpec::new(f.property()))
            .partition(|p| group_by.contains(p.name()));

    if let Some(name) = ineq_property {
        match orders.first() {
            Some(first) if first.property != name => {
                return Err(PlannerError::inequality_sort_mismatch(name, &first.property));
            }
            Some(_) => {}
            // A bare range is served in either direction.
            None => postfix_ordered.push(PropertySpec::new(name)),
        }
    }

    let property_count =
        prefix.len() + postfix_ordered.len() + postfix_group_by.len() + postfix_unordered.len();
    if kind.is_some() && !ancestor && property_count <= 1 {
        required = false;

        // Descending key order is not built in.
        if let Some(first) = postfix_ordered.first() {
            if first.name() == KEY_PROPERTY && first.direction() == Some(Direction::Desc) {
                required = true;
            }
        }
    }

    Ok(Requirement {
        required,
        kind,
        ancestor,
        prefix,
        postfix: Postfix::standard(postfix_ordered, postfix_group_by, postfix_unordered),
    })
}

/// Derives the index a geospatial query needs.
///
/// Only equality filters may accompany region filters; ancestor scoping and
/// sort orders have no geospatial index shape.
pub fn composite_index_for_geo_query(query: &Query) -> PlannerResult<Requirement> {
    check_filter_arity(&query.filters)?;
    if query.has_ancestor {
        return Err(PlannerError::geo_unsatisfiable(
            "Geospatial queries cannot be ancestor-scoped",
        ));
    }
    if let Some(order) = query.orders.first() {
        return Err(PlannerError::geo_unsatisfiable(format!(
            "Geospatial queries cannot be sorted (order on '{}')",
            order.property
        )));
    }

    let mut prefix = BTreeSet::new();
    let mut geo_properties = BTreeSet::new();
    for f in &query.filters {
        match f.op {
            FilterOp::Equal | FilterOp::In => {
                prefix.insert(f.property().to_string());
            }
            FilterOp::ContainedInRegion => {
                geo_properties.insert(PropertySpec::geospatial(f.property()));
            }
            op => {
                return Err(PlannerError::geo_unsatisfiable(format!(
                    "{} filter on '{}' cannot accompany a geospatial filter",
                    op.op_name(),
                    f.property()
                )));
            }
        }
    }

    Ok(Requirement {
        required: true,
        kind: query.kind.clone(),
        ancestor: false,
        prefix,
        postfix: Postfix::geospatial(geo_properties),
    })
}
