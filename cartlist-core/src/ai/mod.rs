//! Model-backed schema-constrained extraction.
//!
//! This module provides a trait-based abstraction over the inference
//! backend so the concrete provider can be substituted or faked in tests
//! without touching the pipeline. A call either returns text that the
//! caller parses against its target schema, or fails; there is no retry
//! and no caching, so every call is a single billable attempt.

mod client;
mod config;
mod fake;
pub mod prompts;

pub use client::OpenAiClient;
pub use config::AiConfig;
pub use fake::FakeAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Role in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request for a chat completion.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// Per-task model override; the client's configured default applies when None.
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    /// If true, request JSON response format.
    pub json_response: bool,
}

/// Trait for AI clients.
///
/// Implementations should be stateless and thread-safe. The `task` name
/// identifies which normalization task issued the call and is used only
/// for logging.
#[async_trait]
pub trait AiClient: Send + Sync + fmt::Debug {
    /// Send a chat request and return the model's text response.
    async fn complete(&self, task: &str, request: ChatRequest) -> Result<String, AiError>;
}
