//! Configuration for deskd.
//!
//! Loads settings from a TOML file when present, then applies
//! environment overrides. The completion service endpoint and the
//! database path are required: their absence is a fatal startup
//! condition, not something the pipeline recovers from at runtime.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/desk/config.toml";

/// Completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible chat completions endpoint
    #[serde(default)]
    pub endpoint: String,

    /// Bearer token for hosted endpoints; local endpoints need none
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model (or deployment) name
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            model: default_model(),
        }
    }
}

/// Support store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file
    #[serde(default)]
    pub path: PathBuf,
}

/// Full deskd configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
}

impl DeskConfig {
    /// Load configuration: TOML file (DESK_CONFIG or the default
    /// path), then environment overrides, then validation.
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("DESK_CONFIG").unwrap_or_else(|_| CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {path}"))?;
            let config: Self = toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file {path}"))?;
            info!("Loaded config from {}", path);
            config
        } else {
            info!("No config file at {}, using environment only", path);
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides win over file values
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("DESK_LLM_ENDPOINT") {
            self.llm.endpoint = v;
        }
        if let Ok(v) = std::env::var("DESK_LLM_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("DESK_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("DESK_DB_PATH") {
            self.database.path = PathBuf::from(v);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.llm.endpoint.is_empty() {
            bail!(
                "Completion service endpoint missing. Set DESK_LLM_ENDPOINT or [llm].endpoint in the config file."
            );
        }
        if self.database.path.as_os_str().is_empty() {
            bail!(
                "Database path missing. Set DESK_DB_PATH or [database].path in the config file."
            );
        }
        Ok(())
    }
}
