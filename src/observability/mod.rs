//! Observability for the index advisor
//!
//! Structured, synchronous JSON log lines for lifecycle events. The planner
//! itself never logs; only the command layer does.
//!
//! # Usage
//!
//! ```ignore
//! use index_advisor::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::IndexesLoaded, &[("count", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
