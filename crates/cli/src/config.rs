//! Command-line configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BAZAAR_CONFIG` | (built-in) | Engine configuration file |
//! | `BAZAAR_LOG_LEVEL` | warn | Log level |

use std::path::PathBuf;

use bazaar_query::{ConfigError, EngineConfig};
use clap::{Parser, Subcommand};

/// Command-line configuration for the `bazaar` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "bazaar")]
#[command(about = "Search, filter and sanitize marketplace records")]
pub struct CliConfig {
    /// Engine configuration file (JSON). Built-in defaults apply when omitted.
    #[arg(long, env = "BAZAAR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "BAZAAR_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Engine operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Rank records by keyword relevance and return one page.
    Search {
        /// JSON file holding an array of records.
        records: PathBuf,

        /// JSON file holding the search query.
        query: PathBuf,

        /// Entity kind whose declared search paths fill an empty `searchPaths`.
        #[arg(long)]
        entity: Option<String>,

        /// Apply the query's filter and sort before ranking.
        #[arg(long)]
        filtered: bool,
    },

    /// Filter and sort records.
    Filter {
        /// JSON file holding an array of records.
        records: PathBuf,

        /// JSON file holding the filter tree. Keeps every record when omitted.
        #[arg(long)]
        filter: Option<PathBuf>,

        /// JSON file holding the sort descriptor.
        #[arg(long)]
        sort: Option<PathBuf>,
    },

    /// Keep the records matching a stored filter preset.
    Preset {
        /// JSON file holding the preset.
        preset: PathBuf,

        /// JSON file holding an array of records.
        records: PathBuf,
    },

    /// Strip fields the requester's roles may not see.
    Sanitize {
        /// JSON file holding a record or an array of records.
        record: PathBuf,

        /// Entity kind of the record.
        #[arg(long)]
        entity: String,

        /// Requester role, highest priority first. Repeatable.
        #[arg(long = "role")]
        roles: Vec<String>,
    },
}

impl Command {
    /// Subcommand name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Search { .. } => "search",
            Command::Filter { .. } => "filter",
            Command::Preset { .. } => "preset",
            Command::Sanitize { .. } => "sanitize",
        }
    }
}

impl CliConfig {
    /// Loads the engine configuration, falling back to the built-in defaults.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        match &self.config {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::default()),
        }
    }
}
