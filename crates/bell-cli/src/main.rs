use std::path::Path;

use anyhow::Context;
use bell_config::BellConfig;
use clap::Parser;

mod cli;
mod commands;
mod definition;
mod output;

fn main() {
    if let Err(error) = run() {
        eprintln!("bell error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(cli.quiet, cli.verbose, &config.general.log_filter)?;

    let flags = cli.global_flags();
    commands::dispatch(&cli.command, &config, &flags)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BellConfig> {
    let config = match path {
        Some(path) => BellConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => BellConfig::load_with_dotenv().context("failed to load configuration")?,
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_tracing(quiet: bool, verbose: bool, configured: &str) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        configured
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BELL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
