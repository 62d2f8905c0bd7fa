//! Backend connection configuration
//!
//! Environment variables win over the optional config file at
//! `~/.tradeport/config.toml`; sensible defaults cover local development.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the portfolio backend
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token for the store's session; optional for open backends
    #[serde(default)]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
        }
    }
}

/// Path of the optional config file (~/.tradeport/config.toml)
pub fn config_file_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".tradeport").join("config.toml"))
}

impl Config {
    /// Load configuration: file first (when present), env overrides
    pub fn load() -> Result<Self> {
        let mut config = match config_file_path() {
            Ok(path) if path.exists() => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {:?}", path))?;
                toml::from_str(&text)
                    .with_context(|| format!("Failed to parse config file {:?}", path))?
            }
            _ => Config::default(),
        };

        if let Ok(url) = std::env::var("TRADEPORT_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        if let Ok(token) = std::env::var("TRADEPORT_TOKEN") {
            if !token.trim().is_empty() {
                config.token = Some(token);
            }
        }

        debug!("Using backend at {}", config.api_url);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_parse_config_file_contents() {
        let config: Config =
            toml::from_str("api_url = \"https://portfolio.example.com\"\ntoken = \"abc\"\n")
                .unwrap();
        assert_eq!(config.api_url, "https://portfolio.example.com");
        assert_eq!(config.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
    }
}
