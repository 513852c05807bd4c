//! Deskline CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the help-desk HTTP gateway
//! - `doctor` — Diagnose configuration and connectivity

use anyhow::Context;
use clap::{Parser, Subcommand};
use deskline_config::AppConfig;
use deskline_core::provider::Provider;
use deskline_providers::OpenAiCompatProvider;
use deskline_tickets::SqliteTicketStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "deskline",
    about = "Deskline — conversational help-desk assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "deskline.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the help-desk HTTP gateway
    Serve {
        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = AppConfig::load_or_default(&cli.config).context("loading configuration")?;
    tracing::debug!(path = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            deskline_gateway::start(config)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
        }
        Commands::Doctor => doctor(&config).await,
    }

    Ok(())
}

/// Check each collaborator and report, without failing fast: a doctor run
/// should show everything that is wrong, not just the first thing.
async fn doctor(config: &AppConfig) {
    println!("Deskline doctor\n");
    println!(
        "  config        model={} api_url={}",
        config.provider.model, config.provider.api_url
    );

    match &config.provider.api_key {
        Some(_) => println!("  api key       set"),
        None => println!("  api key       MISSING — set DESKLINE_API_KEY or provider.api_key"),
    }

    let provider = OpenAiCompatProvider::new(
        "openai",
        &config.provider.api_url,
        config.provider.api_key.clone().unwrap_or_default(),
    );
    match provider.health_check().await {
        Ok(true) => println!("  provider      reachable"),
        Ok(false) => println!("  provider      responded but unhealthy"),
        Err(e) => println!("  provider      UNREACHABLE — {e}"),
    }

    match config.tickets.backend.as_str() {
        "memory" => println!("  ticket store  in-memory (not persistent)"),
        _ => match SqliteTicketStore::new(&config.tickets.sqlite_path).await {
            Ok(_) => println!("  ticket store  sqlite ok ({})", config.tickets.sqlite_path),
            Err(e) => println!("  ticket store  FAILED — {e}"),
        },
    }

    println!(
        "\n  gateway would listen on {}:{}",
        config.gateway.host, config.gateway.port
    );
}
