//! CLI argument definitions using clap
//!
//! Commands:
//! - index-advisor require
//! - index-advisor suggest --config <path>
//! - index-advisor explain --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Composite index advisor for document queries
#[derive(Parser, Debug)]
#[command(name = "index-advisor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the index a query needs, ignoring declared indexes
    Require,

    /// Find the index still missing for a query given declared indexes
    Suggest {
        /// Path to configuration file
        #[arg(long, default_value = "./index-advisor.json")]
        config: PathBuf,
    },

    /// Explain a query's index needs in human-readable form
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./index-advisor.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
