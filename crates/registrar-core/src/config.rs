use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RegistrarError, Result};

/// Top-level configuration for the Registrar assistant.
///
/// Loaded from `~/.registrar/config.toml` by default. Every section is
/// optional and falls back to its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrarConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl RegistrarConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, cannot be parsed, or
    /// holds values that fail [`RegistrarConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RegistrarConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RegistrarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.resolver.min_latency_ms > self.resolver.max_latency_ms {
            return Err(RegistrarError::Config(format!(
                "resolver.min_latency_ms ({}) exceeds resolver.max_latency_ms ({})",
                self.resolver.min_latency_ms, self.resolver.max_latency_ms
            )));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Simulated round-trip latency applied before each answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Lower bound of the uniformly sampled delay, inclusive.
    pub min_latency_ms: u64,
    /// Upper bound of the uniformly sampled delay, inclusive.
    pub max_latency_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: 1000,
            max_latency_ms: 2000,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Seed the conversation with the assistant's greeting turn.
    pub greeting: bool,
    /// Maximum number of turns retained in the log. `0` keeps every turn.
    pub max_turns: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: true,
            max_turns: 0,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
