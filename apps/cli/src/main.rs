//! AppForge CLI: compiles product briefs and specs into build plans.
//!
//! Classifies free-text briefs, enhances product specs with the rules
//! matrix, composes build plans from the component catalog, and scores them
//! with the quality gate.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
