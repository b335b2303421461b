//! Bazaar query engine CLI.

use bazaar_cli::{CliConfig, init_logging, run};
use clap::Parser;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    init_logging(&cli.log_level);

    let engine = cli.engine_config()?;
    info!(
        command = cli.command.name(),
        config = ?cli.config,
        "Running command"
    );

    let output = run(&cli.command, &engine)?;
    let text = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", text);

    Ok(())
}
