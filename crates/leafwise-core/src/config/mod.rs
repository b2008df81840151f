//! Configuration management
//!
//! Read-only after startup: credentials, timeouts, and the remote toggle are
//! loaded once and shared across resolution calls.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whether remote providers are consulted at all; the local knowledge
    /// base is never skipped
    #[serde(default = "default_use_remote")]
    pub use_remote: bool,

    /// Per-call timeout for remote providers, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// External provider credentials
    #[serde(default)]
    pub credentials: ProviderCredentials,
}

/// API credentials for the external providers.
///
/// Environment variable names match the original deployment so existing
/// `.env` setups keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// Gemini generative API key (`GEMINI_API_KEY`)
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Google Custom Search API key (`GOOGLE_API_KEY`)
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Google Custom Search engine id (`GOOGLE_SEARCH_ENGINE_ID`)
    #[serde(default)]
    pub google_search_engine_id: Option<String>,

    /// PlantNet identification API key (`PLANTNET_API_KEY`)
    #[serde(default)]
    pub plantnet_api_key: Option<String>,
}

impl Default for ProviderCredentials {
    fn default() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
            gemini_model: default_gemini_model(),
            google_api_key: std::env::var("GOOGLE_API_KEY").ok().filter(|s| !s.is_empty()),
            google_search_engine_id: std::env::var("GOOGLE_SEARCH_ENGINE_ID")
                .ok()
                .filter(|s| !s.is_empty()),
            plantnet_api_key: std::env::var("PLANTNET_API_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}

impl ProviderCredentials {
    pub fn gemini_configured(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    pub fn google_search_configured(&self) -> bool {
        self.google_api_key.is_some() && self.google_search_engine_id.is_some()
    }

    pub fn plantnet_configured(&self) -> bool {
        self.plantnet_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_remote: default_use_remote(),
            timeout_secs: default_timeout(),
            credentials: ProviderCredentials::default(),
        }
    }
}

impl Config {
    /// Load config from the default path, falling back to env-derived
    /// defaults when no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from an explicit path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}

fn default_use_remote() -> bool {
    true
}

fn default_timeout() -> u64 {
    5
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}
