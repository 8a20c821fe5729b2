//! Index recommendations handed to declaration renderers
//!
//! Prefix properties come first in lexicographic order so output is stable,
//! then postfix properties in their required order.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::index::{IndexDefinition, PropertySpec};

use super::requirement::{Postfix, PostfixGroup, Requirement};
use super::selector::MinimalIndex;

/// Flattens a prefix/postfix pair into a concrete column list.
///
/// Plain properties without a direction become ascending; geospatial
/// properties keep their mode.
pub fn recommended_index_properties(
    prefix: &BTreeSet<String>,
    postfix: &Postfix,
) -> Vec<PropertySpec> {
    let mut properties: Vec<PropertySpec> = prefix.iter().map(PropertySpec::asc).collect();

    for group in postfix.groups() {
        match group {
            PostfixGroup::Unordered(props) => properties.extend(
                props
                    .iter()
                    .cloned()
                    .map(PropertySpec::with_default_direction),
            ),
            PostfixGroup::Ordered(props) => properties.extend(
                props
                    .iter()
                    .cloned()
                    .map(PropertySpec::with_default_direction),
            ),
        }
    }

    properties
}

/// A concrete index suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub kind: Option<String>,
    pub ancestor: bool,
    pub properties: Vec<PropertySpec>,
}

impl Recommendation {
    pub fn from_requirement(requirement: &Requirement) -> Self {
        Self {
            kind: requirement.kind.clone(),
            ancestor: requirement.ancestor,
            properties: recommended_index_properties(&requirement.prefix, &requirement.postfix),
        }
    }

    pub fn from_minimal_index(minimal: &MinimalIndex) -> Self {
        Self {
            kind: minimal.kind.clone(),
            ancestor: minimal.ancestor,
            properties: recommended_index_properties(&minimal.prefix, &minimal.postfix),
        }
    }

    /// Converts into a declarable definition; kindless suggestions have none.
    pub fn into_index_definition(self) -> Option<IndexDefinition> {
        let kind = self.kind?;
        Some(IndexDefinition::new(kind, self.ancestor, self.properties))
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== INDEX RECOMMENDATION ===")?;
        writeln!(f, "Kind: {}", self.kind.as_deref().unwrap_or("(kindless)"))?;
        writeln!(f, "Ancestor: {}", if self.ancestor { "yes" } else { "no" })?;
        writeln!(f, "Properties:")?;
        for property in &self.properties {
            writeln!(f, "  - {}", property)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ast::{Filter, Query};
    use crate::planner::requirement::composite_index_for_query;

    #[test]
    fn test_prefix_sorted_then_postfix_in_order() {
        let query = Query::new("Cat")
            .filter_eq("name")
            .filter_eq("color")
            .order_desc("age")
            .order_asc("weight");
        let req = composite_index_for_query(&query).unwrap();

        assert_eq!(
            recommended_index_properties(&req.prefix, &req.postfix),
            vec![
                PropertySpec::asc("color"),
                PropertySpec::asc("name"),
                PropertySpec::desc("age"),
                PropertySpec::asc("weight"),
            ]
        );
    }

    #[test]
    fn test_open_direction_becomes_ascending() {
        let query = Query::new("Cat").filter_eq("name").with_filter(Filter::lt("age"));
        let rec = Recommendation::from_requirement(&composite_index_for_query(&query).unwrap());
        assert_eq!(
            rec.properties,
            vec![PropertySpec::asc("name"), PropertySpec::asc("age")]
        );
    }

    #[test]
    fn test_geospatial_keeps_mode() {
        let query = Query::new("Park")
            .filter_eq("category")
            .with_filter(Filter::contained_in_region("location"));
        let rec = Recommendation::from_requirement(&composite_index_for_query(&query).unwrap());
        assert_eq!(
            rec.properties,
            vec![PropertySpec::asc("category"), PropertySpec::geospatial("location")]
        );
    }

    #[test]
    fn test_into_index_definition() {
        let query = Query::new("Cat").filter_eq("name").order_asc("age");
        let rec = Recommendation::from_requirement(&composite_index_for_query(&query).unwrap());
        let def = rec.into_index_definition().unwrap();
        assert_eq!(def.kind, "Cat");
        assert_eq!(def.properties.len(), 2);
        def.validate().unwrap();
    }

    #[test]
    fn test_kindless_has_no_definition() {
        let rec = Recommendation {
            kind: None,
            ancestor: false,
            properties: vec![PropertySpec::asc("a")],
        };
        assert!(rec.into_index_definition().is_none());
    }

    #[test]
    fn test_display() {
        let rec = Recommendation {
            kind: Some("Cat".into()),
            ancestor: true,
            properties: vec![PropertySpec::asc("name"), PropertySpec::desc("age")],
        };
        let output = rec.to_string();
        assert!(output.contains("Kind: Cat"));
        assert!(output.contains("Ancestor: yes"));
        assert!(output.contains("  - name asc\n  - age desc"));
    }
}
