//! paddock library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules used by the dashboard server.

pub mod airtable;
pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod ui;
pub mod utils;
pub mod web;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use context::{AppContext, RuntimeOverrides};
use errors::{AppError, AppResult};
use std::path::PathBuf;
use std::sync::Arc;
use utils::date::parse_date;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, ctx: Arc<AppContext>) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(&ctx),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, &ctx),
        Commands::Refresh => cli::commands::refresh::handle(&ctx).await,
        Commands::List { .. } => cli::commands::list::handle(&cli.command, &ctx).await,
        Commands::Conflicts => cli::commands::conflicts::handle(&ctx).await,
        Commands::Alerts => cli::commands::alerts::handle(&ctx).await,
        Commands::Staff { .. } => cli::commands::staff::handle(&cli.command, &ctx).await,
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, &ctx).await,
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, &ctx),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, ctx).await,
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(Config::config_file);
    let mut cfg = Config::load(&config_path)?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    logging::init(&cfg.log)?;

    let today = match &cli.today {
        Some(raw) => Some(parse_date(raw).ok_or_else(|| AppError::InvalidDate(raw.clone()))?),
        None => None,
    };
    let overrides = RuntimeOverrides {
        today,
        fixtures: cli.fixtures.as_ref().map(PathBuf::from),
    };

    let ctx = Arc::new(AppContext::new(config_path, cfg, overrides));
    dispatch(&cli, ctx).await
}
