//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::index::IndexError;
use crate::planner::PlannerError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Planner(#[from] PlannerError),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    /// Error code reported in error responses
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "IDX_CLI_CONFIG_ERROR",
            CliError::Io(_) => "IDX_CLI_IO_ERROR",
            CliError::Json(_) => "IDX_CLI_INVALID_JSON",
            CliError::Index(e) => e.code().code(),
            CliError::Planner(e) => e.code().code(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
