//! gclens -- JVM GC log parser CLI

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use gclens_core::config::GclensConfig;

use cli::{Cli, Commands};
use error::CliError;
use output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config` subcommands report load failures themselves; logging falls back to defaults.
    let mut config = match cli.command {
        Commands::Config(_) => GclensConfig::load(&cli.config).await.unwrap_or_default(),
        _ => commands::load_config(&cli.config).await?,
    };
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
    }

    logging::init_tracing(&config.general, cli.log_format)
        .map_err(|e| CliError::Config(e.to_string()))?;
    tracing::debug!(config = %cli.config.display(), "gclens starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Parse(args) => commands::parse::execute(args, &config, &writer).await,
        Commands::Preprocess(args) => commands::preprocess::execute(args, &config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
