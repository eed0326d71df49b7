//! HTTP utilities for management API calls

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Non-2xx answer from the management API
#[derive(Debug, thiserror::Error)]
#[error("API request failed: {status} (GET {url})")]
pub struct ApiError {
    pub status: StatusCode,
    pub url: String,
}

impl ApiError {
    /// True when the request selected a single artifact by query parameter
    pub fn is_lookup(&self) -> bool {
        self.url.contains('?')
    }
}

/// HTTP client wrapper for management API calls
#[derive(Clone)]
pub struct MiHttpClient {
    client: Client,
}

impl MiHttpClient {
    /// Create a new HTTP client
    ///
    /// `insecure` accepts self-signed certificates, which management
    /// endpoints ship with out of the box.
    pub fn new(insecure: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("micli/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request to the management API
    pub async fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError {
                status,
                url: url.to_string(),
            }
            .into());
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Format a management API error for display
pub fn format_mi_error(error: &anyhow::Error) -> String {
    if let Some(api_error) = error.downcast_ref::<ApiError>() {
        return match api_error.status {
            StatusCode::UNAUTHORIZED => {
                "Authentication failed. The management API rejected the request.".to_string()
            }
            StatusCode::FORBIDDEN => "Permission denied by the management API.".to_string(),
            StatusCode::NOT_FOUND if api_error.is_lookup() => "Artifact not found.".to_string(),
            StatusCode::NOT_FOUND => format!(
                "Management API path not found ({}). Check the environment URL.",
                api_error.url
            ),
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                "The integration runtime reported an internal error. Please try again."
                    .to_string()
            }
            status => format!(
                "Request failed with {} ({}). Check the environment URL and try again.",
                status, api_error.url
            ),
        };
    }

    // Keep the whole chain for transport and config errors so the cause stays visible
    format!("{:#}", error)
}
