//! Client configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the LMS REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Bearer token attached to every request, when set.
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            auth_token: None,
        }
    }
}

impl ClientConfig {
    /// Load from the platform config dir, falling back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Write the configuration back out.
    pub fn save(&self) -> Result<(), ClientError> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "learn-client")
            .map(|d| d.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClientConfig =
            toml::from_str("base_url = \"https://lms.example.com/api\"").unwrap();
        assert_eq!(config.base_url, "https://lms.example.com/api");
        assert_eq!(config.timeout_secs, 10);
    }
}
