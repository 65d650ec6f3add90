//! Portaria CLI
//!
//! Command-line interface for the Portaria facility administration console.

#![forbid(unsafe_code)]

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use portaria_cli::cli::{Cli, Command};
use portaria_cli::{commands, config_handlers, serve};
use portaria_core::types::parse_date;
use portaria_core::{Clock, PortariaConfig, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,portaria=debug".into()),
        )
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Serve { bind } => {
            let config = PortariaConfig::load(config_path).context("failed to load configuration")?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let server = serve::build_server(&config).await?;
            server
                .run(&bind, shutdown_signal())
                .await
                .with_context(|| format!("server on {bind} failed"))?;
        }
        Command::Config { action } => {
            config_handlers::handle_config_command(config_path, action)?;
        }
        Command::CheckStatus {
            date,
            status,
            today,
        } => {
            let today = match today {
                Some(today) => parse_date(&today)?,
                None => facility_today(config_path)?,
            };
            let derived = commands::check_status(&date, &status, today)?;
            println!("{derived}");
        }
        Command::BulkCheck { file, date } => {
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => facility_today(config_path)?,
            };
            let parsed = commands::bulk_check(Path::new(&file), date)?;
            for line in commands::bulk_report(&parsed) {
                println!("{line}");
            }
            if parsed.accepted.is_empty() {
                anyhow::bail!("no valid lines in {file}");
            }
        }
    }

    Ok(())
}

fn facility_today(config_path: Option<&str>) -> Result<chrono::NaiveDate> {
    let config = PortariaConfig::load(config_path)?;
    Ok(SystemClock::from_name(&config.clock.timezone)?.today())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
