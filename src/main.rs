//! Covidash - COVID-19 Italy Dashboard & Interactive Chart Server
//!
//! Fetches the national feed, derives the dashboard metrics and serves the
//! interactive time-series charts over HTTP.

mod charts;
mod data;
mod stats;
mod web;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::data::{DataLoader, DEFAULT_FEED_URL};
use crate::web::AppState;

#[derive(Parser)]
#[command(name = "covidash")]
#[command(about = "COVID-19 Italy dashboard server")]
#[command(version)]
struct Cli {
    /// Server bind address
    #[arg(short, long, default_value = "0.0.0.0:8050")]
    bind: SocketAddr,

    /// CSV feed URL
    #[arg(short, long, default_value = DEFAULT_FEED_URL)]
    url: String,

    /// Fetch timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let loader = DataLoader::new(&cli.url, Duration::from_secs(cli.timeout_secs))
        .context("Failed to build feed client")?;

    web::serve(cli.bind, AppState::new(loader)).await
}
