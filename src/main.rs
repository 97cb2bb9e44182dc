use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod commands;
mod config;
mod contract;
mod db;
mod models;
mod services;
mod state;
mod utils;

use commands::Command;
use config::{Config, ConfigArgs};

/// Client for the Krypt transactions contract
#[derive(Debug, Parser)]
#[command(name = "krypt", version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in ["krypt_client=debug", "sqlx=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from(cli.config);
    info!("Starting krypt client v{}", env!("CARGO_PKG_VERSION"));
    debug!("database: {}", config.database_url);

    if commands::handle_command(cli.command, &config).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
