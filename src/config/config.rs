use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEXT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHAT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_ANALYTICS_API_URL: &str = "http://localhost:8002";

/// Base addresses for the three backend services.
///
/// Resolution order, strongest first: command-line overrides (applied by
/// the binary after parsing), environment variables, the optional user
/// config file, built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Text/document service base URL
    pub text_api_url: String,

    /// Chat service base URL
    pub chat_api_url: String,

    /// Analytics service base URL
    pub analytics_api_url: String,

    #[serde(skip)]
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            text_api_url: DEFAULT_TEXT_API_URL.to_string(),
            chat_api_url: DEFAULT_CHAT_API_URL.to_string(),
            analytics_api_url: DEFAULT_ANALYTICS_API_URL.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl AppConfig {
    /// Load config from the default location, then apply environment
    /// overrides. A missing or unreadable config file is not an error;
    /// the built-in defaults stand in.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .ok()
            .filter(|path| path.exists())
            .and_then(|path| Self::load_from_path(&path).ok())
            .unwrap_or_default();
        config.apply_env();
        config
    }

    /// Load config from an explicit TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&contents)?;
        config.version = env!("CARGO_PKG_VERSION").to_string();
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("dth-client").join("config.toml"))
    }

    /// Overwrite each address whose environment variable is set and
    /// non-empty.
    pub fn apply_env(&mut self) {
        if let Some(url) = env_non_empty("DTH_API_URL") {
            self.text_api_url = url;
        }
        if let Some(url) = env_non_empty("DTH_CHAT_URL") {
            self.chat_api_url = url;
        }
        if let Some(url) = env_non_empty("DTH_ANALYTICS_URL") {
            self.analytics_api_url = url;
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
