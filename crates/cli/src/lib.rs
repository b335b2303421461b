//! Bazaar command-line front end.
//!
//! Loads records and request documents from JSON files, runs them through
//! [`bazaar_query`], and prints the result as JSON on stdout. Logs go to
//! stderr so output can be piped.

pub mod commands;
pub mod config;

pub use commands::run;
pub use config::{CliConfig, Command};

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bazaar_query={},bazaar_cli={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
