//! AI configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Default OpenAI-compatible base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when a task does not specify one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// AI client configuration. Loaded once at process start and passed into
/// the client constructor; never read ad hoc mid-request.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for the inference backend.
    pub api_key: String,
    /// Default model name, used when a request carries no override.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`: API key for the inference backend
    ///
    /// Optional:
    /// - `CARTLIST_AI_MODEL`: Default model name (default: "gpt-4o-mini")
    /// - `CARTLIST_AI_BASE_URL`: API base URL (default: "https://api.openai.com/v1")
    /// - `CARTLIST_AI_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let model = env::var("CARTLIST_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("CARTLIST_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("CARTLIST_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
