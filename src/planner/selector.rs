//! Minimal index selection against already-declared indexes
//!
//! Declared indexes that share a trailing shape can be merged by the
//! executor, so candidates are grouped into families keyed by the columns
//! after their equality run. Each family accumulates how much of the
//! equality prefix (and ancestor support) is still uncovered.
//!
//! Family choice among partial matches is a cost heuristic:
//! `|remaining properties| + 2 * remaining ancestor`, ties broken by
//! ancestor, then remaining property names, then family shape.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::index::{IndexDefinition, PropertySpec};

use super::ast::Query;
use super::errors::PlannerResult;
use super::matcher::match_postfix;
use super::requirement::{composite_index_for_query, Postfix, Requirement};

/// Index that must still be declared for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinimalIndex {
    /// True when nothing usable exists and this is the full requirement;
    /// false when it completes a partially matching family
    pub optimal: bool,
    pub kind: Option<String>,
    pub ancestor: bool,
    pub prefix: BTreeSet<String>,
    pub postfix: Postfix,
}

/// Uncovered remainder for one index family
#[derive(Debug, Clone, PartialEq, Eq)]
struct Remaining {
    properties: BTreeSet<String>,
    ancestor: bool,
}

impl Remaining {
    fn is_empty(&self) -> bool {
        self.properties.is_empty() && !self.ancestor
    }

    fn cost(&self) -> usize {
        self.properties.len() + if self.ancestor { 2 } else { 0 }
    }

    fn cmp_preference(&self, other: &Remaining) -> Ordering {
        self.cost()
            .cmp(&other.cost())
            .then_with(|| self.ancestor.cmp(&other.ancestor))
            .then_with(|| self.properties.cmp(&other.properties))
    }
}

/// Finds the smallest index still needed for `query` given the declared
/// `indexes`.
///
/// Returns `Ok(None)` when no declared index is needed, either because the
/// query is served natively or because the declared indexes cover it.
pub fn minimal_composite_index_for_query<'a, I>(
    query: &Query,
    indexes: I,
) -> PlannerResult<Option<MinimalIndex>>
where
    I: IntoIterator<Item = &'a IndexDefinition>,
{
    let Requirement {
        required,
        kind,
        ancestor,
        prefix,
        postfix,
    } = composite_index_for_query(query)?;
    if !required {
        return Ok(None);
    }

    let mut families: BTreeMap<Vec<PropertySpec>, Remaining> = BTreeMap::new();

    for definition in indexes {
        if kind.as_deref() != Some(definition.kind.as_str()) {
            continue;
        }
        // Ancestor indexes cannot serve non-ancestor queries.
        if !ancestor && definition.ancestor {
            continue;
        }

        let index_properties = definition.key_properties();
        let Some(leading) = match_postfix(&postfix, &index_properties) else {
            continue;
        };

        let leading_names: BTreeSet<&str> = leading.iter().map(PropertySpec::name).collect();
        if leading_names.iter().any(|name| !prefix.contains(*name)) {
            continue;
        }

        let family = index_properties[leading.len()..].to_vec();
        let current = families.get(&family).cloned().unwrap_or_else(|| Remaining {
            properties: prefix.clone(),
            ancestor,
        });

        let mut next = current.clone();
        next.properties.retain(|p| !leading_names.contains(p.as_str()));
        if definition.ancestor {
            next.ancestor = false;
        }

        if next.is_empty() {
            return Ok(None);
        }
        if next == current {
            continue;
        }
        families.insert(family, next);
    }

    let best = families.into_iter().min_by(|(shape_a, a), (shape_b, b)| {
        a.cmp_preference(b).then_with(|| shape_a.cmp(shape_b))
    });

    Ok(Some(match best {
        None => MinimalIndex {
            optimal: true,
            kind,
            ancestor,
            prefix,
            postfix,
        },
        Some((shape, remaining)) => MinimalIndex {
            optimal: false,
            kind,
            ancestor: remaining.ancestor,
            prefix: remaining.properties,
            postfix: Postfix::ordered(shape),
        },
    }))
}
