//! Explain output for index requirement checks
//!
//! Produces deterministic, human-readable output describing what a query
//! needs and what, if anything, must still be declared.

use std::fmt;

use serde::Serialize;

use crate::index::IndexDefinition;

use super::ast::Query;
use super::errors::PlannerError;
use super::recommend::Recommendation;
use super::requirement::{composite_index_for_query, PostfixGroup, Requirement};
use super::selector::minimal_composite_index_for_query;

/// Outcome of checking a query against declared indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Served without a declared index
    NotRequired,
    /// Declared indexes already cover the query
    Covered,
    /// A new index must be declared
    Suggested,
    /// The query violates a planner invariant
    Rejected,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::NotRequired => "NOT_REQUIRED",
            Outcome::Covered => "COVERED",
            Outcome::Suggested => "SUGGESTED",
            Outcome::Rejected => "REJECTED",
        }
    }
}

/// Explain output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    pub outcome: Outcome,
    /// Kind of the query (if accepted)
    pub kind: Option<String>,
    /// Equality prefix, sorted
    pub prefix: Vec<String>,
    /// Rendered postfix groups, most significant first
    pub postfix: Vec<String>,
    /// Whether the suggestion is the from-scratch optimum
    pub optimal: Option<bool>,
    /// Index to declare (if suggested)
    pub recommendation: Option<Recommendation>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

fn render_group(group: &PostfixGroup) -> String {
    let (open, close, names): (&str, &str, Vec<String>) = match group {
        PostfixGroup::Ordered(props) => ("[", "]", props.iter().map(ToString::to_string).collect()),
        PostfixGroup::Unordered(props) => {
            ("{", "}", props.iter().map(ToString::to_string).collect())
        }
    };
    format!("{}{}{}", open, names.join(", "), close)
}

impl ExplainPlan {
    /// Checks `query` against `indexes`. Never fails; invariant violations
    /// become a rejected plan.
    pub fn explain<'a, I>(query: &Query, indexes: I) -> Self
    where
        I: IntoIterator<Item = &'a IndexDefinition>,
    {
        let requirement = match composite_index_for_query(query) {
            Ok(requirement) => requirement,
            Err(e) => return Self::from_error(&e),
        };

        let mut plan = Self::from_requirement(&requirement);
        if !requirement.required {
            return plan;
        }

        match minimal_composite_index_for_query(query, indexes) {
            Ok(None) => plan.outcome = Outcome::Covered,
            Ok(Some(minimal)) => {
                plan.outcome = Outcome::Suggested;
                plan.optimal = Some(minimal.optimal);
                plan.recommendation = Some(Recommendation::from_minimal_index(&minimal));
            }
            Err(e) => return Self::from_error(&e),
        }
        plan
    }

    fn from_requirement(requirement: &Requirement) -> Self {
        Self {
            outcome: Outcome::NotRequired,
            kind: requirement.kind.clone(),
            prefix: requirement.prefix.iter().cloned().collect(),
            postfix: requirement
                .postfix
                .groups()
                .iter()
                .filter(|g| !g.is_empty())
                .map(render_group)
                .collect(),
            optimal: None,
            recommendation: None,
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(err: &PlannerError) -> Self {
        Self {
            outcome: Outcome::Rejected,
            kind: None,
            prefix: Vec::new(),
            postfix: Vec::new(),
            optimal: None,
            recommendation: None,
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN INDEX ===")?;
        writeln!(f, "Status: {}", self.outcome.as_str())?;

        if self.outcome == Outcome::Rejected {
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
            return Ok(());
        }

        writeln!(f, "Kind: {}", self.kind.as_deref().unwrap_or("(kindless)"))?;
        if !self.prefix.is_empty() {
            writeln!(f, "Equality Prefix: {}", self.prefix.join(", "))?;
        }
        if !self.postfix.is_empty() {
            writeln!(f, "Postfix: {}", self.postfix.join(" "))?;
        }
        if let Some(optimal) = self.optimal {
            writeln!(f, "Optimal: {}", if optimal { "yes" } else { "no" })?;
        }
        if let Some(rec) = &self.recommendation {
            write!(f, "{}", rec)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PropertySpec;
    use crate::planner::ast::Filter;

    const NO_INDEXES: &[IndexDefinition] = &[];

    fn cat_query() -> Query {
        Query::new("Cat").filter_eq("name").filter_eq("color").order_asc("age")
    }

    #[test]
    fn test_explain_not_required() {
        let explain = ExplainPlan::explain(&Query::new("Cat").filter_eq("name"), NO_INDEXES);
        assert_eq!(explain.outcome, Outcome::NotRequired);
        assert!(explain.recommendation.is_none());
        assert!(explain.to_string().contains("NOT_REQUIRED"));
    }

    #[test]
    fn test_explain_suggested() {
        let explain = ExplainPlan::explain(&cat_query(), NO_INDEXES);
        assert_eq!(explain.outcome, Outcome::Suggested);
        assert_eq!(explain.optimal, Some(true));
        assert_eq!(explain.prefix, vec!["color".to_string(), "name".to_string()]);
        assert_eq!(explain.postfix, vec!["[age asc]".to_string()]);

        let output = explain.to_string();
        assert!(output.contains("SUGGESTED"));
        assert!(output.contains("  - color asc"));
    }

    #[test]
    fn test_explain_covered() {
        let indexes = [IndexDefinition::new(
            "Cat",
            false,
            [PropertySpec::new("name"), PropertySpec::new("color"), PropertySpec::asc("age")],
        )];
        let explain = ExplainPlan::explain(&cat_query(), &indexes);
        assert_eq!(explain.outcome, Outcome::Covered);
    }

    #[test]
    fn test_explain_rejected() {
        let query = Query::new("Cat")
            .with_filter(Filter::gt("age"))
            .with_filter(Filter::lt("height"));
        let explain = ExplainPlan::explain(&query, NO_INDEXES);
        assert_eq!(explain.outcome, Outcome::Rejected);
        assert_eq!(explain.rejection_code.as_deref(), Some("IDX_MULTIPLE_INEQUALITY"));

        let output = explain.to_string();
        assert!(output.contains("REJECTED"));
        assert!(output.contains("IDX_MULTIPLE_INEQUALITY"));
    }

    #[test]
    fn test_explain_deterministic() {
        let first = ExplainPlan::explain(&cat_query(), NO_INDEXES).to_string();
        let second = ExplainPlan::explain(&cat_query(), NO_INDEXES).to_string();
        assert_eq!(first, second);
    }
}
