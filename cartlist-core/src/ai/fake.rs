//! Fake AI client for testing.
//!
//! Returns deterministic responses based on prompt matching, allowing
//! tests to run without network access or API costs. Tracks the number
//! of calls made so tests can assert that validation short-circuits
//! before any model invocation.

use super::{AiClient, AiError, ChatRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// A fake AI client for testing.
///
/// Responses are matched by checking if any message in the request
/// contains a registered substring. If no match is found, returns the
/// default response or an error.
#[derive(Debug)]
pub struct FakeAiClient {
    /// Map of prompt substring -> response
    responses: RwLock<HashMap<String, String>>,
    /// Default response if no match found
    default_response: Option<String>,
    /// Number of complete() calls made
    calls: AtomicUsize,
}

impl Default for FakeAiClient {
    fn default() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: Some("{}".to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeAiClient {
    /// Create a new FakeAiClient with no registered responses.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a FakeAiClient that returns a specific response for prompts
    /// containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut client = Self::new();
        client.add_response(prompt_contains, response);
        client
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap()
            .insert(prompt_contains.to_string(), response.to_string());
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Number of complete() calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(&self, _task: &str, request: ChatRequest) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase();

        let responses = self.responses.read().unwrap();
        for (pattern, response) in responses.iter() {
            if prompt.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(AiError::RequestFailed(format!(
                "FakeAiClient: No response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }
}
