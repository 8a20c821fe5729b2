//! CLI command implementations
//!
//! Every command reads one query from stdin. `require` ignores declared
//! indexes; `suggest` and `explain` load them through the configuration
//! file first.

use std::path::Path;

use serde_json::{json, Value};

use crate::index::IndexDefinitions;
use crate::observability::{log_event_with_fields, Event};
use crate::planner::{
    composite_index_for_query, minimal_composite_index_for_query, ExplainPlan, Outcome,
    PlannerError, PlannerResult, Query, Recommendation,
};

use super::args::Command;
use super::config::{load_index_definitions, Config};
use super::errors::CliResult;
use super::io::{read_request, write_error, write_response, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. Failures are
/// reported as an error envelope on stdout and returned to the caller.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let result = run_command(cli.command);
    if let Err(e) = &result {
        // The error is still returned; a failed write here changes nothing.
        let _ = write_error(e.code(), &e.to_string());
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Require => require(),
        Command::Suggest { config } => suggest(&config),
        Command::Explain { config } => explain(&config),
    }
}

/// Derive the composite index a query needs, ignoring declared indexes
pub fn require() -> CliResult<()> {
    let query: Query = read_request()?;
    let response = require_response(&query, true)?;
    write_response(response)
}

/// Find the index still missing for a query given the declared indexes
pub fn suggest(config_path: &Path) -> CliResult<()> {
    let (config, indexes) = load_environment(config_path)?;
    let query: Query = read_request()?;
    let response = suggest_response(&query, &indexes, config.log_events)?;
    write_response(response)
}

/// Print a human-readable explanation for a query
pub fn explain(config_path: &Path) -> CliResult<()> {
    let (config, indexes) = load_environment(config_path)?;
    let query: Query = read_request()?;
    let plan = explain_plan(&query, &indexes, config.log_events);
    write_text(&plan.to_string())
}

/// Response body for `require`
pub fn require_response(query: &Query, log_events: bool) -> CliResult<Value> {
    let requirement = logged(composite_index_for_query(query), log_events)?;
    if log_events {
        log_event_with_fields(
            Event::RequirementComputed,
            &[
                ("kind", query.kind.as_deref().unwrap_or("")),
                ("required", if requirement.required { "true" } else { "false" }),
            ],
        );
    }

    let mut response = json!({ "requirement": serde_json::to_value(&requirement)? });
    if requirement.required {
        let recommendation = Recommendation::from_requirement(&requirement);
        response["recommendation"] = serde_json::to_value(&recommendation)?;
    }
    Ok(response)
}

/// Response body for `suggest`
pub fn suggest_response(
    query: &Query,
    indexes: &IndexDefinitions,
    log_events: bool,
) -> CliResult<Value> {
    let kind = query.kind.as_deref().unwrap_or("");
    let minimal = logged(
        minimal_composite_index_for_query(query, indexes.for_kind(kind)),
        log_events,
    )?;

    match minimal {
        None => {
            if log_events {
                log_event_with_fields(Event::IndexCovered, &[("kind", kind)]);
            }
            Ok(json!({ "index_needed": false }))
        }
        Some(minimal) => {
            let recommendation = Recommendation::from_minimal_index(&minimal);
            if log_events {
                let properties = recommendation.properties.len().to_string();
                log_event_with_fields(
                    Event::IndexSuggested,
                    &[
                        ("kind", kind),
                        ("optimal", if minimal.optimal { "true" } else { "false" }),
                        ("properties", properties.as_str()),
                    ],
                );
            }
            Ok(json!({
                "index_needed": true,
                "optimal": minimal.optimal,
                "recommendation": serde_json::to_value(&recommendation)?,
            }))
        }
    }
}

/// Plan for `explain`; its outcome is logged like `suggest` logs its result
pub fn explain_plan(query: &Query, indexes: &IndexDefinitions, log_events: bool) -> ExplainPlan {
    let kind = query.kind.as_deref().unwrap_or("");
    let plan = ExplainPlan::explain(query, indexes.for_kind(kind));
    if !log_events {
        return plan;
    }

    let event = outcome_event(plan.outcome);
    match plan.outcome {
        Outcome::NotRequired => {
            log_event_with_fields(event, &[("kind", kind), ("required", "false")]);
        }
        Outcome::Covered => log_event_with_fields(event, &[("kind", kind)]),
        Outcome::Suggested => {
            let properties = plan
                .recommendation
                .as_ref()
                .map_or(0, |r| r.properties.len())
                .to_string();
            let optimal = plan.optimal.unwrap_or(false);
            log_event_with_fields(
                event,
                &[
                    ("kind", kind),
                    ("optimal", if optimal { "true" } else { "false" }),
                    ("properties", properties.as_str()),
                ],
            );
        }
        Outcome::Rejected => log_event_with_fields(
            event,
            &[
                ("code", plan.rejection_code.as_deref().unwrap_or("")),
                ("message", plan.rejection_reason.as_deref().unwrap_or("")),
            ],
        ),
    }
    plan
}

/// Lifecycle event reported for an explain outcome
fn outcome_event(outcome: Outcome) -> Event {
    match outcome {
        Outcome::NotRequired => Event::RequirementComputed,
        Outcome::Covered => Event::IndexCovered,
        Outcome::Suggested => Event::IndexSuggested,
        Outcome::Rejected => Event::QueryRejected,
    }
}

fn load_environment(config_path: &Path) -> CliResult<(Config, IndexDefinitions)> {
    let config = Config::load(config_path)?;
    let path = config_path.display().to_string();
    if config.log_events {
        log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);
    }

    let indexes = load_index_definitions(&config, config_path)?;
    if config.log_events {
        let count = indexes.len().to_string();
        let distinct = indexes.keys().len().to_string();
        log_event_with_fields(
            Event::IndexesLoaded,
            &[("count", count.as_str()), ("distinct", distinct.as_str())],
        );
    }
    Ok((config, indexes))
}

fn logged<T>(result: PlannerResult<T>, log_events: bool) -> PlannerResult<T> {
    if let Err(e) = &result {
        if log_events {
            log_rejection(e);
        }
    }
    result
}

fn log_rejection(e: &PlannerError) {
    log_event_with_fields(
        Event::QueryRejected,
        &[("code", e.code().code()), ("message", e.message())],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexDefinition, PropertySpec};
    use crate::planner::{Filter, SortSpec};

    fn cats_by_name_and_age() -> Query {
        Query::new("Cat")
            .filter_eq("name")
            .with_order(SortSpec::asc("age"))
    }

    #[test]
    fn test_require_response_needs_index() {
        let response = require_response(&cats_by_name_and_age(), false).unwrap();
        assert_eq!(response["requirement"]["required"], json!(true));
        assert_eq!(response["recommendation"]["kind"], json!("Cat"));
        assert_eq!(
            response["recommendation"]["properties"],
            json!([
                {"name": "name", "direction": "asc"},
                {"name": "age", "direction": "asc"}
            ])
        );
    }

    #[test]
    fn test_require_response_builtin() {
        let response = require_response(&Query::new("Cat").filter_eq("name"), false).unwrap();
        assert_eq!(response["requirement"]["required"], json!(false));
        assert!(response.get("recommendation").is_none());
    }

    #[test]
    fn test_require_response_rejects_two_inequalities() {
        let query = Query::new("Cat")
            .with_filter(Filter::lt("a"))
            .with_filter(Filter::gt("b"));
        let err = require_response(&query, false).unwrap_err();
        assert_eq!(err.code(), "IDX_MULTIPLE_INEQUALITY");
    }

    #[test]
    fn test_suggest_response_covered() {
        let indexes = IndexDefinitions::new([IndexDefinition::new(
            "Cat",
            false,
            [PropertySpec::asc("name"), PropertySpec::asc("age")],
        )]);
        let response = suggest_response(&cats_by_name_and_age(), &indexes, false).unwrap();
        assert_eq!(response, json!({ "index_needed": false }));
    }

    #[test]
    fn test_suggest_response_missing() {
        let response =
            suggest_response(&cats_by_name_and_age(), &IndexDefinitions::default(), false)
                .unwrap();
        assert_eq!(response["index_needed"], json!(true));
        assert_eq!(response["optimal"], json!(true));
    }

    #[test]
    fn test_suggest_ignores_other_kinds() {
        let indexes = IndexDefinitions::new([IndexDefinition::new(
            "Dog",
            false,
            [PropertySpec::asc("name"), PropertySpec::asc("age")],
        )]);
        let response = suggest_response(&cats_by_name_and_age(), &indexes, false).unwrap();
        assert_eq!(response["index_needed"], json!(true));
        assert_eq!(response["optimal"], json!(true));
    }

    #[test]
    fn test_explain_plan_outcomes_with_logging() {
        let covering = IndexDefinitions::new([IndexDefinition::new(
            "Cat",
            false,
            [PropertySpec::asc("name"), PropertySpec::asc("age")],
        )]);
        let plan = explain_plan(&cats_by_name_and_age(), &covering, true);
        assert_eq!(plan.outcome, Outcome::Covered);

        let plan = explain_plan(&cats_by_name_and_age(), &IndexDefinitions::default(), true);
        assert_eq!(plan.outcome, Outcome::Suggested);

        let plan = explain_plan(&Query::new("Cat").filter_eq("name"), &covering, true);
        assert_eq!(plan.outcome, Outcome::NotRequired);

        let invalid = Query::new("Cat")
            .with_filter(Filter::lt("a"))
            .with_filter(Filter::gt("b"));
        let plan = explain_plan(&invalid, &covering, true);
        assert_eq!(plan.outcome, Outcome::Rejected);
    }

    #[test]
    fn test_outcome_events_match_suggest() {
        assert_eq!(outcome_event(Outcome::Covered), Event::IndexCovered);
        assert_eq!(outcome_event(Outcome::Suggested), Event::IndexSuggested);
        assert_eq!(outcome_event(Outcome::Rejected), Event::QueryRejected);
        assert_eq!(outcome_event(Outcome::NotRequired), Event::RequirementComputed);
    }
}
