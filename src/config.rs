//! Configuration Management
//!
//! Handles the persistent set of named environments the CLI can talk to.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A configured integration runtime
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Environment {
    /// Base URL of the management endpoint, e.g. `https://localhost:9164`
    pub url: String,
    /// Accept invalid TLS certificates
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub insecure: bool,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("micli").join("config.yaml"))
    }

    /// Resolve the config path (CLI override > default location)
    pub fn resolve_path(override_path: Option<&Path>) -> Result<PathBuf> {
        match override_path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path().context("Could not determine the configuration directory"),
        }
    }

    /// Load configuration from disk
    ///
    /// A missing file yields an empty configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Look up a named environment
    pub fn environment(&self, name: &str) -> Result<&Environment> {
        self.environments
            .get(name)
            .with_context(|| format!("Environment '{}' is not configured", name))
    }

    /// Add or replace an environment
    pub fn add_environment(&mut self, name: &str, url: &str, insecure: bool) -> Result<()> {
        if name.trim().is_empty() {
            anyhow::bail!("Environment name must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Environment URL must start with http:// or https://, got '{}'", url);
        }

        self.environments.insert(
            name.to_string(),
            Environment {
                url: url.trim_end_matches('/').to_string(),
                insecure,
            },
        );
        Ok(())
    }

    /// Remove an environment
    pub fn remove_environment(&mut self, name: &str) -> Result<Environment> {
        self.environments
            .remove(name)
            .with_context(|| format!("Environment '{}' is not configured", name))
    }
}
