//! Tabdash - config-driven tabbed dashboard
//!
//! Reads a TOML configuration, builds the tabs it declares and serves the
//! resulting page locally.
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard described by ./config.toml on http://127.0.0.1:7860
//! tabdash
//!
//! # Another config file and port
//! tabdash --config deploy/config.toml --port 8080
//!
//! # Validate the configuration and print the tab plan without serving
//! tabdash --check
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tabdash::app;
use tabdash::config::Settings;
use tabdash::constants::{APP_BINARY_NAME, APP_NAME, DEFAULT_CONFIG_NAME};
use tabdash::web::{self, AppState};

/// Tabdash - config-driven tabbed dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_NAME)]
    config: PathBuf,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "7860")]
    port: u16,

    /// Build the dashboard, print its tabs and exit without serving
    #[arg(long)]
    check: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration is read once here and shared from then on
    let settings = match Settings::load(&cli.config) {
        Ok(settings) => Arc::new(settings),
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("Usage: {} --config path/to/config.toml", APP_BINARY_NAME);
            std::process::exit(1);
        }
    };

    let blocks = match app::create_app(Arc::clone(&settings)) {
        Ok(blocks) => blocks,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    if cli.check {
        println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
        println!("Configuration: {}", cli.config.display());
        for (index, tab) in blocks.tabs().iter().enumerate() {
            println!(
                "  {}. {} ({} widgets)",
                index + 1,
                tab.title,
                tab.children.len()
            );
        }
        println!("Event bindings: {}", blocks.bindings().len());
        return Ok(());
    }

    let state = AppState::new(blocks, &settings)?;
    if let Some(dir) = state.static_dir() {
        info!("Serving static files from {}", dir.display());
    }
    if !web::static_files::has_embedded_assets() {
        tracing::warn!("Client script is not embedded; the page will not be interactive");
    }

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid --host/--port")?;

    web::run_server(state, addr).await
}
