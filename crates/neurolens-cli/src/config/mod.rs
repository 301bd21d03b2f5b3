//! Configuration loading for neurolens.
//! Reads neurolens.toml from the current directory or the path in NEUROLENS_CONFIG.

use neurolens_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "NEUROLENS_CONFIG";
pub const BASE_URL_ENV: &str = "NEUROLENS_BASE_URL";
const DEFAULT_CONFIG_FILE: &str = "neurolens.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "warn,neurolens=info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}


impl Config {
    /// Load configuration.
    ///
    /// An explicit path (flag or NEUROLENS_CONFIG) must exist; the default
    /// neurolens.toml is optional and defaults apply without it. NEUROLENS_BASE_URL
    /// overrides the file's base URL.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => match std::env::var(CONFIG_ENV) {
                Ok(p) => (PathBuf::from(p), true),
                Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if required {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy neurolens.example.toml to neurolens.toml and edit it.",
                path.display()
            );
        } else {
            Self::default()
        };

        config.override_base_url(std::env::var(BASE_URL_ENV).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Empty values are ignored.
    pub fn override_base_url(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.client.base_url = url;
        }
    }
}
