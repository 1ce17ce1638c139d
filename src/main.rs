//! Messages View
//!
//! Entry point: render the view once to stdout, or serve it over HTTP.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use messages_view::client::HttpMessageSource;
use messages_view::config::{AppConfig, Cli};
use messages_view::server::start_server;
use messages_view::telemetry;
use messages_view::view::render_once;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads the environment
    let _ = dotenv();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::from_cli(&cli).context("Configuration error")?);

    telemetry::init(config.logging.format)?;

    info!(
        name: "config.loaded",
        endpoint = %config.endpoint.url,
        once = cli.once,
        "Configuration loaded"
    );

    if cli.once {
        return print_once(&config).await;
    }

    start_server(config).await
}

/// Mount once, wait for the fetch, print the fragment and exit.
async fn print_once(config: &AppConfig) -> anyhow::Result<()> {
    let source = HttpMessageSource::new(&config.endpoint).context("Invalid endpoint")?;
    let (fragment, state) = render_once(Arc::new(source)).await;

    println!("{fragment}");

    if let Some(e) = state.error() {
        anyhow::bail!("Failed to load messages: {e}");
    }
    Ok(())
}
