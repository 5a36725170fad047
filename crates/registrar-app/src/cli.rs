//! CLI argument definitions for the Registrar assistant.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use registrar_core::config::RegistrarConfig;
use std::path::PathBuf;

/// Registrar: ask natural-language questions about student records.
#[derive(Parser, Debug)]
#[command(name = "registrar", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Lower bound of the simulated reply delay, in milliseconds.
    #[arg(long = "min-latency-ms")]
    pub min_latency_ms: Option<u64>,

    /// Upper bound of the simulated reply delay, in milliseconds.
    #[arg(long = "max-latency-ms")]
    pub max_latency_ms: Option<u64>,

    /// Start without the assistant's greeting.
    #[arg(long = "no-greeting")]
    pub no_greeting: bool,

    /// Ask a single question, print the answer, and exit.
    #[arg(short = 'q', long = "query")]
    pub query: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > REGISTRAR_CONFIG env var > platform default (~/.registrar/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("REGISTRAR_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// Fold flag overrides into a loaded configuration.
    pub fn apply_overrides(&self, config: &mut RegistrarConfig) {
        if let Some(ms) = self.min_latency_ms {
            config.resolver.min_latency_ms = ms;
        }
        if let Some(ms) = self.max_latency_ms {
            config.resolver.max_latency_ms = ms;
        }
        if self.no_greeting {
            config.chat.greeting = false;
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".registrar").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".registrar").join("config.toml");
    }
    PathBuf::from("config.toml")
}
