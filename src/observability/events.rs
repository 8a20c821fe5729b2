//! Observable events of the index advisor
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file loaded
    ConfigLoaded,
    /// Index declaration document loaded
    IndexesLoaded,
    /// Requirement derived for a query
    RequirementComputed,
    /// Declared indexes already cover the query
    IndexCovered,
    /// A new index declaration is needed
    IndexSuggested,
    /// Query violated a planner invariant
    QueryRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::IndexesLoaded => "INDEXES_LOADED",
            Event::RequirementComputed => "REQUIREMENT_COMPUTED",
            Event::IndexCovered => "INDEX_COVERED",
            Event::IndexSuggested => "INDEX_SUGGESTED",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryRejected => Severity::Error,
            Event::IndexSuggested => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
