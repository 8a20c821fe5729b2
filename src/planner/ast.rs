//! Query structures consumed by requirement derivation
//!
//! Queries arrive already decoded; only the shape matters here (which
//! operator touches which property, and in what order results are sorted),
//! never the filter values.

use serde::{Deserialize, Serialize};

use crate::index::Direction;

/// Reserved property holding the entity key
pub const KEY_PROPERTY: &str = "__key__";
/// Reserved property used for scatter sampling
pub const SCATTER_PROPERTY: &str = "__scatter__";
/// Reserved pseudo-property for unapplied log timestamps
pub const UNAPPLIED_LOG_TIMESTAMP_PROPERTY: &str = "__unapplied_log_timestamp_us__";

/// All reserved property names
pub const SPECIAL_PROPERTIES: [&str; 3] = [
    KEY_PROPERTY,
    SCATTER_PROPERTY,
    UNAPPLIED_LOG_TIMESTAMP_PROPERTY,
];

/// Returns true for reserved property names
pub fn is_special_property(name: &str) -> bool {
    SPECIAL_PROPERTIES.contains(&name)
}

/// Filter operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOp {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Exists,
    ContainedInRegion,
    In,
}

impl FilterOp {
    /// Returns true if this is an equality operation
    pub fn is_equality(&self) -> bool {
        matches!(self, FilterOp::Equal)
    }

    /// Returns true if this is a range operation
    pub fn is_inequality(&self) -> bool {
        matches!(
            self,
            FilterOp::LessThan
                | FilterOp::LessThanOrEqual
                | FilterOp::GreaterThan
                | FilterOp::GreaterThanOrEqual
        )
    }

    pub fn is_exists(&self) -> bool {
        matches!(self, FilterOp::Exists)
    }

    pub fn is_geospatial(&self) -> bool {
        matches!(self, FilterOp::ContainedInRegion)
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            FilterOp::Equal => "EQUAL",
            FilterOp::LessThan => "LESS_THAN",
            FilterOp::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            FilterOp::GreaterThan => "GREATER_THAN",
            FilterOp::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            FilterOp::Exists => "EXISTS",
            FilterOp::ContainedInRegion => "CONTAINED_IN_REGION",
            FilterOp::In => "IN",
        }
    }
}

/// A single filter.
///
/// `properties` holds one entry per property/value pair the filter carries,
/// so an `IN` over three values has three entries of the same name. Every
/// other operator carries exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub op: FilterOp,
    pub properties: Vec<String>,
}

impl Filter {
    pub fn new(op: FilterOp, property: impl Into<String>) -> Self {
        Self {
            op,
            properties: vec![property.into()],
        }
    }

    pub fn eq(property: impl Into<String>) -> Self {
        Self::new(FilterOp::Equal, property)
    }

    pub fn lt(property: impl Into<String>) -> Self {
        Self::new(FilterOp::LessThan, property)
    }

    pub fn lte(property: impl Into<String>) -> Self {
        Self::new(FilterOp::LessThanOrEqual, property)
    }

    pub fn gt(property: impl Into<String>) -> Self {
        Self::new(FilterOp::GreaterThan, property)
    }

    pub fn gte(property: impl Into<String>) -> Self {
        Self::new(FilterOp::GreaterThanOrEqual, property)
    }

    pub fn exists(property: impl Into<String>) -> Self {
        Self::new(FilterOp::Exists, property)
    }

    pub fn contained_in_region(property: impl Into<String>) -> Self {
        Self::new(FilterOp::ContainedInRegion, property)
    }

    /// An `IN` filter over `values` values of one property
    pub fn in_values(property: impl Into<String>, values: usize) -> Self {
        let name = property.into();
        Self {
            op: FilterOp::In,
            properties: vec![name; values],
        }
    }

    /// Name of the filtered property (the first entry)
    pub fn property(&self) -> &str {
        self.properties.first().map(String::as_str).unwrap_or("")
    }

    pub fn is_equality(&self) -> bool {
        self.op.is_equality()
    }

    pub fn is_inequality(&self) -> bool {
        self.op.is_inequality()
    }

    pub fn is_exists(&self) -> bool {
        self.op.is_exists()
    }

    pub fn is_geospatial(&self) -> bool {
        self.op.is_geospatial()
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Property to sort by
    pub property: String,
    /// Sort direction
    #[serde(default = "default_direction")]
    pub direction: Direction,
}

fn default_direction() -> Direction {
    Direction::Asc
}

impl SortSpec {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// Decoded query shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Entity kind; kindless queries never need a declared index
    #[serde(default)]
    pub kind: Option<String>,
    /// Whether the query is scoped to an ancestor
    #[serde(default)]
    pub has_ancestor: bool,
    /// Filters, all combined with AND
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Sort orders, most significant first
    #[serde(default)]
    pub orders: Vec<SortSpec>,
    /// Projected properties; each must exist on matching entities
    #[serde(default)]
    pub property_names: Vec<String>,
    /// Group-by properties; each must exist on matching entities
    #[serde(default)]
    pub group_by_property_names: Vec<String>,
}

impl Query {
    /// Creates a query over `kind`
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Creates a kindless query
    pub fn kindless() -> Self {
        Self::default()
    }

    pub fn with_ancestor(mut self) -> Self {
        self.has_ancestor = true;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds an equality filter
    pub fn filter_eq(self, property: impl Into<String>) -> Self {
        self.with_filter(Filter::eq(property))
    }

    pub fn with_order(mut self, order: SortSpec) -> Self {
        self.orders.push(order);
        self
    }

    pub fn order_asc(self, property: impl Into<String>) -> Self {
        self.with_order(SortSpec::asc(property))
    }

    pub fn order_desc(self, property: impl Into<String>) -> Self {
        self.with_order(SortSpec::desc(property))
    }

    pub fn with_property_name(mut self, property: impl Into<String>) -> Self {
        self.property_names.push(property.into());
        self
    }

    pub fn with_group_by(mut self, property: impl Into<String>) -> Self {
        self.group_by_property_names.push(property.into());
        self
    }

    /// Properties that must be present: projections, then group-by
    pub fn exists_properties(&self) -> Vec<String> {
        self.property_names
            .iter()
            .chain(self.group_by_property_names.iter())
            .cloned()
            .collect()
    }

    /// Returns true if any filter is geospatial
    pub fn is_geospatial(&self) -> bool {
        self.filters.iter().any(Filter::is_geospatial)
    }
}
