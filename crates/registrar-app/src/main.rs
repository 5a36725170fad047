//! Registrar application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialise tracing (stderr, so the transcript on stdout stays clean)
//! 3. Build the chat surface over the seeded roster
//! 4. Answer a single `--query`, or run the interactive chat loop

mod cli;
mod terminal;

use clap::Parser;
use registrar_chat::ChatSurface;
use registrar_core::config::RegistrarConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config_exists = config_file.exists();
    let mut config = if config_exists {
        RegistrarConfig::load_or_default(&config_file)
    } else {
        RegistrarConfig::default()
    };
    args.apply_overrides(&mut config);

    // Tracing. Priority: --log-level > RUST_LOG > config file.
    let filter = match args.resolve_log_level() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Registrar v{}", env!("CARGO_PKG_VERSION"));
    if config_exists {
        tracing::info!(path = %config_file.display(), "Configuration loaded");
    } else {
        tracing::debug!(path = %config_file.display(), "No configuration file, using defaults");
    }

    let surface = match ChatSurface::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    let session_id = surface.session_id()?;
    tracing::info!(
        %session_id,
        min_latency_ms = config.resolver.min_latency_ms,
        max_latency_ms = config.resolver.max_latency_ms,
        "Chat surface ready"
    );

    match args.query {
        Some(ref query) => terminal::run_once(&surface, query).await?,
        None => terminal::run_repl(surface).await?,
    }

    tracing::info!("Registrar stopped");
    Ok(())
}
