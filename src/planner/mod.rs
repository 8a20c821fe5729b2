//! Composite index requirement planner
//!
//! Decides whether a query needs a declared composite index, what that
//! index must look like, and what is still missing given the indexes that
//! are already declared.
//!
//! # Pipeline (strict order)
//!
//! 1. Normalize filters and orders
//! 2. Remove natively supported components
//! 3. Derive the requirement (equality prefix + ordered postfix)
//! 4. Match the postfix against declared indexes and pick the cheapest
//!    completion
//!
//! Every stage is a pure function over immutable inputs.

mod ast;
mod errors;
mod explain;
mod matcher;
mod normalize;
mod recommend;
mod requirement;
mod selector;

pub use ast::{
    is_special_property, Filter, FilterOp, Query, SortSpec, KEY_PROPERTY, SCATTER_PROPERTY,
    SPECIAL_PROPERTIES, UNAPPLIED_LOG_TIMESTAMP_PROPERTY,
};
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult, Severity};
pub use explain::{ExplainPlan, Outcome};
pub use matcher::match_postfix;
pub use normalize::{normalize, remove_natively_supported};
pub use recommend::{recommended_index_properties, Recommendation};
pub use requirement::{
    composite_index_for_geo_query, composite_index_for_query, validate_query, Postfix,
    PostfixGroup, Requirement,
};
pub use selector::{minimal_composite_index_for_query, MinimalIndex};
