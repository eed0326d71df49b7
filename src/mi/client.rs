//! Management API client
//!
//! Binds an HTTP client to one configured environment and exposes the two
//! artifact requests the management API offers: list and lookup by key.

use super::http::MiHttpClient;
use crate::config::Config;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Client for one integration runtime environment
#[derive(Clone)]
pub struct MiClient {
    pub http: MiHttpClient,
    pub environment: String,
    pub base_url: String,
}

impl MiClient {
    /// Create a client for an explicit management endpoint
    pub fn new(environment: &str, base_url: &str, insecure: bool) -> Result<Self> {
        let http = MiHttpClient::new(insecure)?;

        Ok(Self {
            http,
            environment: environment.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for a named environment from the configuration
    pub fn for_environment(config: &Config, environment: &str) -> Result<Self> {
        let env = config.environment(environment)?;
        tracing::debug!("Using environment '{}' at {}", environment, env.url);
        Self::new(environment, &env.url, env.insecure)
    }

    /// Build a management API URL
    pub fn management_url(&self, path: &str) -> String {
        format!("{}/management/{}", self.base_url, path)
    }

    /// Fetch the list form of an artifact resource
    pub async fn get_artifact_list<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.management_url(path);
        let response = self.http.get(&url).await?;
        serde_json::from_value(response)
            .with_context(|| format!("Failed to decode artifact list from {}", path))
    }

    /// Fetch a single artifact, selected by a query parameter
    pub async fn get_artifact_info<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        value: &str,
    ) -> Result<T> {
        let url = format!(
            "{}?{}={}",
            self.management_url(path),
            key,
            urlencoding::encode(value)
        );
        let response = self.http.get(&url).await?;
        serde_json::from_value(response)
            .with_context(|| format!("Failed to decode artifact '{}' from {}", value, path))
    }
}
