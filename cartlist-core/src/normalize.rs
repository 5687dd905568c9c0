//! AI-backed normalization from free text to the structured shopping vocabulary.
//!
//! Two entry points share one mechanism: build a fixed system policy plus
//! a user payload embedding the raw input, make a single schema-constrained
//! JSON call, parse and validate the result. Empty input is rejected before
//! any model call is made, and nothing is retried here; retry policy, if
//! any, belongs to the caller.

use serde::Deserialize;
use thiserror::Error;

use crate::ai::prompts::ingredients::{
    render_ingredients_user_prompt, INGREDIENTS_SYSTEM_PROMPT, INGREDIENTS_TASK_NAME,
};
use crate::ai::prompts::instructions::{
    render_instructions_user_prompt, INSTRUCTIONS_SYSTEM_PROMPT, INSTRUCTIONS_TASK_NAME,
};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest};
use crate::types::{validate_line_items, LineItem};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("{0}")]
    EmptyInput(&'static str),

    #[error("AI call failed: {0}")]
    Ai(#[from] AiError),

    #[error("Failed to parse model output: {0}")]
    Parse(String),

    #[error("Model output failed validation: {0}")]
    Validation(String),
}

/// Per-task model overrides. Loaded once at process start and passed
/// into [`crate::pipeline::Pipeline::new`]; the client's configured
/// default applies to any task left as None.
#[derive(Debug, Clone, Default)]
pub struct TaskModels {
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
}

impl TaskModels {
    /// Load overrides from environment variables.
    ///
    /// Optional:
    /// - `CARTLIST_INGREDIENTS_MODEL`: model for the ingredients task
    /// - `CARTLIST_INSTRUCTIONS_MODEL`: model for the instructions task
    pub fn from_env() -> Self {
        Self {
            ingredients: std::env::var("CARTLIST_INGREDIENTS_MODEL").ok(),
            instructions: std::env::var("CARTLIST_INSTRUCTIONS_MODEL").ok(),
        }
    }
}

/// One normalization task: name, prompt, and model are fixed together so
/// variants cannot drift apart.
#[derive(Debug, Clone)]
pub struct NormalizeTask {
    pub name: &'static str,
    pub system_prompt: &'static str,
    /// Model override for this task; the client default applies when None.
    pub model: Option<String>,
}

impl NormalizeTask {
    /// The ingredients task.
    pub fn ingredients(model: Option<String>) -> Self {
        Self {
            name: INGREDIENTS_TASK_NAME,
            system_prompt: INGREDIENTS_SYSTEM_PROMPT,
            model,
        }
    }

    /// The instructions task.
    pub fn instructions(model: Option<String>) -> Self {
        Self {
            name: INSTRUCTIONS_TASK_NAME,
            system_prompt: INSTRUCTIONS_SYSTEM_PROMPT,
            model,
        }
    }

    fn request(&self, user_prompt: String) -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage::system(self.system_prompt),
                ChatMessage::user(user_prompt),
            ],
            model: self.model.clone(),
            max_tokens: Some(4096),
            json_response: true,
        }
    }
}

/// Target schema for the ingredients task.
#[derive(Debug, Deserialize)]
struct IngredientsOutput {
    ingredients: Vec<LineItem>,
}

/// Target schema for the instructions task.
#[derive(Debug, Deserialize)]
struct InstructionsOutput {
    instructions: Vec<String>,
}

/// Normalize free-text ingredient lines into structured line items.
///
/// Never returns an empty list for non-empty input: a model response with
/// zero items, blank names, or non-positive quantities fails validation.
pub async fn normalize_ingredients(
    ai: &dyn AiClient,
    task: &NormalizeTask,
    raw: &[String],
) -> Result<Vec<LineItem>, NormalizeError> {
    if raw.is_empty() {
        return Err(NormalizeError::EmptyInput("No ingredients provided."));
    }

    let request = task.request(render_ingredients_user_prompt(raw));
    let response = ai.complete(task.name, request).await?;

    let output: IngredientsOutput = serde_json::from_str(response.trim())
        .map_err(|e| NormalizeError::Parse(format!("{} - response was: {}", e, response)))?;

    validate_line_items(&output.ingredients).map_err(NormalizeError::Validation)?;

    tracing::debug!(
        raw_lines = raw.len(),
        line_items = output.ingredients.len(),
        "normalized ingredients"
    );

    Ok(output.ingredients)
}

/// Segment a free-text instruction blob into discrete steps.
pub async fn normalize_instructions(
    ai: &dyn AiClient,
    task: &NormalizeTask,
    raw: &str,
) -> Result<Vec<String>, NormalizeError> {
    if raw.trim().is_empty() {
        return Err(NormalizeError::EmptyInput("No instructions provided."));
    }

    let request = task.request(render_instructions_user_prompt(raw));
    let response = ai.complete(task.name, request).await?;

    let output: InstructionsOutput = serde_json::from_str(response.trim())
        .map_err(|e| NormalizeError::Parse(format!("{} - response was: {}", e, response)))?;

    if output.instructions.is_empty() {
        return Err(NormalizeError::Validation(
            "model returned no instruction steps".to_string(),
        ));
    }
    if output.instructions.iter().any(|s| s.trim().is_empty()) {
        return Err(NormalizeError::Validation(
            "model returned a blank instruction step".to_string(),
        ));
    }

    Ok(output.instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    fn raw_lines(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_input_rejected_before_any_ai_call() {
        let ai = FakeAiClient::new();
        let task = NormalizeTask::ingredients(None);

        let err = normalize_ingredients(&ai, &task, &[]).await.unwrap_err();
        assert!(matches!(err, NormalizeError::EmptyInput(_)));
        assert_eq!(ai.call_count(), 0);

        let err = normalize_instructions(&ai, &NormalizeTask::instructions(None), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, NormalizeError::EmptyInput(_)));
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn parses_conforming_line_items() {
        let ai = FakeAiClient::with_response(
            "2 cups flour",
            r#"{"ingredients": [
                {"name": "flour", "quantity": 2.0, "unit": "cup", "display_text": "2 cups flour"},
                {"name": "salt", "quantity": 1.0, "unit": "teaspoon", "display_text": "1 tsp salt"}
            ]}"#,
        );
        let task = NormalizeTask::ingredients(None);

        let items = normalize_ingredients(&ai, &task, &raw_lines(&["2 cups flour", "1 tsp salt"]))
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "flour");
        assert_eq!(items[1].name, "salt");
        assert_eq!(ai.call_count(), 1);
    }

    #[tokio::test]
    async fn defaults_fill_in_for_sparse_model_output() {
        let ai = FakeAiClient::with_response(
            "pinch of saffron",
            r#"{"ingredients": [{"name": "saffron"}]}"#,
        );
        let task = NormalizeTask::ingredients(None);

        let items = normalize_ingredients(&ai, &task, &raw_lines(&["pinch of saffron"]))
            .await
            .unwrap();

        assert_eq!(items[0].quantity, 1.0);
        assert_eq!(items[0].unit, "each");
    }

    #[tokio::test]
    async fn non_json_output_is_a_parse_error() {
        let ai = FakeAiClient::new().with_default_response("I can't help with that");
        let task = NormalizeTask::ingredients(None);

        let err = normalize_ingredients(&ai, &task, &raw_lines(&["2 cups flour"]))
            .await
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[tokio::test]
    async fn empty_item_list_fails_validation() {
        let ai = FakeAiClient::new().with_default_response(r#"{"ingredients": []}"#);
        let task = NormalizeTask::ingredients(None);

        let err = normalize_ingredients(&ai, &task, &raw_lines(&["2 cups flour"]))
            .await
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Validation(_)));
    }

    #[tokio::test]
    async fn blank_name_fails_validation() {
        let ai = FakeAiClient::new()
            .with_default_response(r#"{"ingredients": [{"name": ""}]}"#);
        let task = NormalizeTask::ingredients(None);

        let err = normalize_ingredients(&ai, &task, &raw_lines(&["2 cups flour"]))
            .await
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Validation(_)));
    }

    #[tokio::test]
    async fn segments_instruction_blob() {
        let ai = FakeAiClient::with_response(
            "mix. bake",
            r#"{"instructions": ["Mix the ingredients.", "Bake at 450F."]}"#,
        );
        let task = NormalizeTask::instructions(None);

        let steps = normalize_instructions(&ai, &task, "Mix. Bake at 450F.")
            .await
            .unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], "Mix the ingredients.");
    }

    #[test]
    fn injected_model_override_reaches_the_request() {
        let task = NormalizeTask::ingredients(Some("fast-model".to_string()));
        let request = task.request("Input:\n- 1 apple".to_string());
        assert_eq!(request.model.as_deref(), Some("fast-model"));

        let task = NormalizeTask::instructions(None);
        let request = task.request("Input:\nMix.".to_string());
        assert!(request.model.is_none());
    }

    #[tokio::test]
    async fn empty_step_list_fails_validation() {
        let ai = FakeAiClient::new().with_default_response(r#"{"instructions": []}"#);
        let task = NormalizeTask::instructions(None);

        let err = normalize_instructions(&ai, &task, "Mix. Bake.")
            .await
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Validation(_)));
    }
}
