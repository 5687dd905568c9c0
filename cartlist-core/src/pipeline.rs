//! Orchestration of extract, normalize, and submit.
//!
//! Each stage is also exposed standalone so a caller that already has
//! structured data can skip the earlier stages. Every component failure
//! is mapped into one [`PipelineError`] taxonomy; no stage runs after a
//! failed predecessor, and no failure is swallowed or defaulted.

use std::sync::Arc;

use thiserror::Error;

use crate::ai::AiClient;
use crate::error::ExtractError;
use crate::extract::extract_recipe;
use crate::instacart::{InstacartClient, SubmitError};
use crate::normalize::{self, NormalizeError, NormalizeTask, TaskModels};
use crate::types::{ExtractedRecipe, LineItem, ShoppingList};

/// Uniform error taxonomy for the whole pipeline.
///
/// `InvalidInput` and `NoIngredientsFound` are client-facing outcomes;
/// `ExtractionFailed` and `SchemaExtraction` are server-side failures;
/// `Submission` carries the partner's status and body verbatim, with
/// `status: None` meaning the partner was unreachable.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("No ingredients found.")]
    NoIngredientsFound,

    #[error("Recipe extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Schema extraction failed: {0}")]
    SchemaExtraction(String),

    #[error("Shopping list submission failed: {body}")]
    Submission { status: Option<u16>, body: String },
}

impl From<ExtractError> for PipelineError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NoIngredients => PipelineError::NoIngredientsFound,
            other => PipelineError::ExtractionFailed(other.to_string()),
        }
    }
}

impl From<NormalizeError> for PipelineError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::EmptyInput(msg) => PipelineError::InvalidInput(msg.to_string()),
            other => PipelineError::SchemaExtraction(other.to_string()),
        }
    }
}

impl From<SubmitError> for PipelineError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::MissingField(field) => {
                PipelineError::InvalidInput(format!("No {} provided.", field))
            }
            SubmitError::Request(msg) => PipelineError::Submission {
                status: None,
                body: msg,
            },
            SubmitError::Api { status, body } => PipelineError::Submission {
                status: Some(status),
                body,
            },
        }
    }
}

/// The request pipeline: extraction, normalization, and partner submission.
///
/// Holds only immutable configuration and clients; all per-request state is
/// local to each call, so one instance serves concurrent requests.
#[derive(Debug)]
pub struct Pipeline {
    ai: Arc<dyn AiClient>,
    instacart: InstacartClient,
    ingredients_task: NormalizeTask,
    instructions_task: NormalizeTask,
}

impl Pipeline {
    pub fn new(ai: Arc<dyn AiClient>, instacart: InstacartClient, models: TaskModels) -> Self {
        Self {
            ai,
            instacart,
            ingredients_task: NormalizeTask::ingredients(models.ingredients),
            instructions_task: NormalizeTask::instructions(models.instructions),
        }
    }

    /// Extract a recipe from raw page HTML.
    ///
    /// The source URL is passed through to extraction for resolving
    /// relative links; its syntax is not validated here.
    pub fn parse_recipe(
        &self,
        html: &str,
        source_url: &str,
    ) -> Result<ExtractedRecipe, PipelineError> {
        if html.trim().is_empty() {
            return Err(PipelineError::InvalidInput("No HTML provided.".to_string()));
        }

        let recipe = extract_recipe(html, source_url)?;
        tracing::info!(
            title = %recipe.title,
            ingredients = recipe.ingredients.len(),
            "extracted recipe"
        );
        Ok(recipe)
    }

    /// Normalize free-text ingredient lines into structured line items.
    pub async fn normalize_ingredients(
        &self,
        raw: &[String],
    ) -> Result<Vec<LineItem>, PipelineError> {
        let items =
            normalize::normalize_ingredients(self.ai.as_ref(), &self.ingredients_task, raw).await?;
        Ok(items)
    }

    /// Segment a free-text instruction blob into discrete steps.
    pub async fn normalize_instructions(&self, raw: &str) -> Result<Vec<String>, PipelineError> {
        let steps =
            normalize::normalize_instructions(self.ai.as_ref(), &self.instructions_task, raw)
                .await?;
        Ok(steps)
    }

    /// Submit a fully structured shopping list to the partner service.
    pub async fn submit(&self, list: &ShoppingList) -> Result<serde_json::Value, PipelineError> {
        let body = self.instacart.submit(list).await?;
        Ok(body)
    }

    /// The full "HTML in, shareable link out" use case.
    ///
    /// Stages run strictly in order; instructions are normalized and
    /// forwarded only when the page had any.
    pub async fn shopping_list_from_html(
        &self,
        html: &str,
        source_url: &str,
    ) -> Result<serde_json::Value, PipelineError> {
        let recipe = self.parse_recipe(html, source_url)?;
        let ingredients = self.normalize_ingredients(&recipe.ingredients).await?;

        let instructions = if recipe.instructions.trim().is_empty() {
            None
        } else {
            Some(self.normalize_instructions(&recipe.instructions).await?)
        };

        let list = ShoppingList {
            title: recipe.title,
            ingredients,
            instructions,
            image_url: recipe.image_url,
        };

        self.submit(&list).await
    }
}
