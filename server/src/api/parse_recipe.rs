use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::{error_response, ErrorResponse};
use crate::AppState;

/// Request body for recipe extraction
#[derive(Debug, Deserialize, ToSchema)]
pub struct ParseRecipeRequest {
    /// Raw page HTML
    pub html: String,
    /// The page's source URL, used for resolving relative links
    pub url: String,
}

/// Extracted recipe content
#[derive(Debug, Serialize, ToSchema)]
pub struct ParseRecipeResponse {
    pub title: String,
    /// Free-text ingredient lines in original recipe order
    pub ingredients: Vec<String>,
    /// Instructions as a single free-text blob
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

/// Extract a recipe from raw page HTML
///
/// Stateless: nothing is stored. A page that parses but yields zero
/// ingredients is rejected, because a shopping pipeline has no use for it.
#[utoipa::path(
    post,
    path = "/parse-recipe",
    tag = "recipes",
    request_body = ParseRecipeRequest,
    responses(
        (status = 200, description = "Extracted recipe content", body = ParseRecipeResponse),
        (status = 400, description = "Empty HTML or no ingredients found", body = ErrorResponse),
        (status = 500, description = "Extraction failed", body = ErrorResponse)
    )
)]
pub async fn parse_recipe(
    State(pipeline): State<AppState>,
    Json(request): Json<ParseRecipeRequest>,
) -> impl IntoResponse {
    match pipeline.parse_recipe(&request.html, &request.url) {
        Ok(recipe) => (
            StatusCode::OK,
            Json(ParseRecipeResponse {
                title: recipe.title,
                ingredients: recipe.ingredients,
                instructions: recipe.instructions,
                image_url: recipe.image_url,
                canonical_url: recipe.canonical_url,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
