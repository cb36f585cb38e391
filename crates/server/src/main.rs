//! # sheetform-server
//!
//! HTTP server for reading and extending the theater and video call
//! schedules.

mod routes;

use anyhow::{Context, Result};
use clap::Parser;
use sheetform_http::{Config, SheetsClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::routes::{create_router, AppState};

/// sheetform-server - schedule API backed by Google Sheets
#[derive(Parser)]
#[command(name = "sheetform-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "SHEETFORM_CONFIG", default_value = "sheetform.yaml")]
    config: PathBuf,

    /// Address to listen on
    #[arg(short, long, env = "SHEETFORM_BIND", default_value = "0.0.0.0:3000")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?
        .with_env();
    if config.access_token.is_none() {
        tracing::warn!("no access token configured, requests will be anonymous");
    }
    let client = SheetsClient::from_config(&config).context("Failed to build sheets client")?;
    tracing::info!(spreadsheet = client.spreadsheet_id(), "using spreadsheet");

    let app = create_router(AppState::new(Arc::new(client), config));

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    tracing::info!("sheetform-server listening on {}", cli.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
