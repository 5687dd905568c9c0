//! OpenAI-compatible chat completions client.

use super::{AiClient, AiConfig, AiError, ChatRequest, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Client for an OpenAI-compatible chat completions API.
#[derive(Debug)]
pub struct OpenAiClient {
    config: AiConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new client from environment configuration.
    pub fn from_env() -> Result<Self, AiError> {
        let config = AiConfig::from_env().map_err(|e| AiError::NotConfigured(e.to_string()))?;
        Self::new(config)
    }
}

/// Chat completions request format.
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Chat completions response format.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Error response from the API.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[async_trait]
impl AiClient for OpenAiClient {
    async fn complete(&self, task: &str, request: ChatRequest) -> Result<String, AiError> {
        let model = request
            .model
            .unwrap_or_else(|| self.config.model.clone());

        tracing::debug!(task = task, model = %model, "sending chat completion request");

        let body = CompletionRequest {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: match m.role {
                        Role::System => "system",
                        Role::User => "user",
                    },
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        if status != 200 {
            // Try to parse a structured error response first
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&text) {
                return Err(AiError::ApiError {
                    status,
                    message: error_response.error.message,
                });
            }
            return Err(AiError::ApiError {
                status,
                message: text,
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| AiError::ParseError(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::ParseError("No content in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatMessage;
    use std::time::Duration;

    fn test_config(base_url: String) -> AiConfig {
        AiConfig {
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            base_url,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                r#"{"choices": [{"message": {"content": "{\"ok\": true}"}}]}"#,
            )
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(server.url())).unwrap();
        let request = ChatRequest {
            messages: vec![ChatMessage::user("respond with JSON")],
            json_response: true,
            ..Default::default()
        };

        let content = client.complete("test", request).await.unwrap();
        assert_eq!(content, r#"{"ok": true}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn surfaces_api_errors_with_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "bad key"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(server.url())).unwrap();
        let request = ChatRequest {
            messages: vec![ChatMessage::user("hi")],
            ..Default::default()
        };

        let err = client.complete("test", request).await.unwrap_err();
        match err {
            AiError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn per_request_model_override_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "override-model"
            })))
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "ok"}}]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(server.url())).unwrap();
        let request = ChatRequest {
            messages: vec![ChatMessage::user("hi")],
            model: Some("override-model".to_string()),
            ..Default::default()
        };

        client.complete("test", request).await.unwrap();
        mock.assert_async().await;
    }
}
