//! Command-line interface for the index advisor
//!
//! Provides:
//! - require: derive the index a query needs
//! - suggest: find the index still missing given declared indexes
//! - explain: human-readable explanation of a query's index needs

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    explain, explain_plan, require, require_response, run, run_command, suggest, suggest_response,
};
pub use config::{load_index_definitions, Config};
pub use errors::{CliError, CliResult};
pub use io::{parse_request, read_request, write_error, write_response, write_text};
