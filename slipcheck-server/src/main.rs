//! # Slipcheck Server
//!
//! HTTP API for settling football bet slips against API-Sports fixture results.

mod api;
mod error;

use anyhow::{Context, Result};
use clap::Parser;
use slipcheck_core::Settings;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "slipcheck-server")]
#[command(about = "HTTP API for settling football bet slips")]
#[command(version)]
struct Args {
    /// Extra configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Listen address (overrides server.bind)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    settings.logging.init();
    info!(config = %settings.digest(), "Configuration loaded");

    let bind = args.bind.unwrap_or_else(|| settings.server.bind.clone());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!(address = %bind, "Listening");

    let app = api::create_router(api::AppState::new(settings));
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
