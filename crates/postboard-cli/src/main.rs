//! Postboard CLI - browse the remote post feed and manage local users
//!
//! Every command goes through the same `AppContainer` the library exposes,
//! so the terminal sees exactly what any other front end would.

mod cli;
mod commands;
mod error;


use clap::Parser;
use postboard_core::app::AppContainer;
use postboard_core::config::AppConfig;
use postboard_core::logging::{self, LogConfig};

use crate::cli::{Cli, Commands};
use crate::commands::info::run_info;
use crate::commands::posts::{run_post, run_posts};
use crate::commands::users::run_users;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init(&LogConfig::from_app_config(&config));
    tracing::info!("Application started - environment: {}", config.environment);

    let container = AppContainer::new(config)?;

    match cli.command {
        Commands::Info => run_info(&container),
        Commands::Posts { limit, json } => run_posts(&container, limit, json).await?,
        Commands::Post { id, json } => run_post(&container, id, json).await?,
        Commands::Users { command } => run_users(&container, command).await?,
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let mut config = AppConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_api_base_url(base_url)?;
    }
    if let Some(db_path) = cli.db_path.clone() {
        config = config.with_database_path(db_path);
    }
    Ok(config)
}
