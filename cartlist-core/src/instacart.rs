//! Partner products-link submission.
//!
//! Forwards a fully structured shopping list to the partner service and
//! returns its response body verbatim. This module never retries and
//! never reshapes the success payload; partner rejections keep their
//! original status and body so the caller can tell a validation error
//! from an outage.

use std::env;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::error::ConfigError;
use crate::types::{LineItem, ShoppingList};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("No {0} provided.")]
    MissingField(&'static str),

    #[error("Partner request failed: {0}")]
    Request(String),

    #[error("Partner returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Partner service configuration. Loaded once at process start.
#[derive(Debug, Clone)]
pub struct InstacartConfig {
    /// Base URL of the partner API.
    pub base_url: String,
    /// Bearer credential attached to every request.
    pub api_key: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl InstacartConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `INSTACART_SERVER`: Base URL of the partner API
    /// - `INSTACART_API_KEY`: Bearer credential
    ///
    /// Optional:
    /// - `INSTACART_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("INSTACART_SERVER")
            .map_err(|_| ConfigError::MissingEnvVar("INSTACART_SERVER".to_string()))?;
        let api_key = env::var("INSTACART_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("INSTACART_API_KEY".to_string()))?;

        let timeout_secs = env::var("INSTACART_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Outbound products-link payload.
///
/// Optional fields are skipped entirely when absent; the partner must
/// never receive placeholder nulls for genuinely absent data.
#[derive(Debug, Serialize)]
struct ProductsLinkPayload<'a> {
    title: &'a str,
    line_items: &'a [LineItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

/// Client for the partner shopping-list service.
#[derive(Debug)]
pub struct InstacartClient {
    config: InstacartConfig,
    client: reqwest::Client,
}

impl InstacartClient {
    /// Create a new client with the given configuration.
    pub fn new(config: InstacartConfig) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SubmitError::Request(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Submit a shopping list and return the partner's response body verbatim.
    ///
    /// The body contains the shareable list URL plus partner metadata; it is
    /// intentionally not reshaped here.
    pub async fn submit(&self, list: &ShoppingList) -> Result<serde_json::Value, SubmitError> {
        if list.title.trim().is_empty() {
            return Err(SubmitError::MissingField("title"));
        }
        if list.ingredients.is_empty() {
            return Err(SubmitError::MissingField("ingredients"));
        }

        // A present-but-empty step list means the same as absent; the
        // partner must not receive an empty instructions array.
        let instructions = list.instructions.as_deref().filter(|s| !s.is_empty());

        let payload = ProductsLinkPayload {
            title: &list.title,
            line_items: &list.ingredients,
            instructions,
            image_url: list.image_url.as_deref(),
        };

        let url = format!(
            "{}/idp/v1/products/products_link",
            self.config.base_url.trim_end_matches('/')
        );

        tracing::info!(
            title = %list.title,
            line_items = list.ingredients.len(),
            "submitting shopping list to partner"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SubmitError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(SubmitError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| SubmitError::Request(format!("invalid partner response body: {}", e)))
    }
}
