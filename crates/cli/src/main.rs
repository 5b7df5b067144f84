//! loterias CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging: --log-level, then [general].log_level
    let log_level = match cli.log_level.clone() {
        Some(level) => level,
        None => AppConfig::load(cli.config.as_deref())
            .map(|config| config.general.log_level)
            .unwrap_or_else(|_| "info".to_string()),
    };
    init_logging(&log_level)?;

    // Execute command
    match cli.command {
        Commands::Latest(args) => commands::results::latest(args, cli.config).await,
        Commands::Contest(args) => commands::results::contest(args, cli.config).await,
        Commands::All(args) => commands::results::all(args, cli.config).await,
        Commands::Normalize(args) => commands::normalize::execute(args).await,
        Commands::Future(args) => commands::future::execute(args, cli.config).await,
        Commands::Sitemap(args) => commands::seo::sitemap(args, cli.config).await,
        Commands::Robots => commands::seo::robots(cli.config).await,
        Commands::Config(args) => commands::config::execute(args).await,
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
