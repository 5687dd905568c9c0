use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::{error_response, ErrorResponse};
use crate::types::LineItem;
use crate::AppState;

/// Request body for ingredient normalization
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngredientsRequest {
    /// Free-text ingredient lines in recipe order
    pub ingredients: Vec<String>,
}

/// Structured line items in the same order as the input
#[derive(Debug, Serialize, ToSchema)]
pub struct IngredientsResponse {
    pub ingredients: Vec<LineItem>,
}

/// Normalize free-text ingredient lines into structured line items
///
/// A single model call per request; nothing is retried or cached here.
#[utoipa::path(
    post,
    path = "/instacart-ingredients",
    tag = "normalize",
    request_body = IngredientsRequest,
    responses(
        (status = 200, description = "Structured line items", body = IngredientsResponse),
        (status = 400, description = "No ingredients provided", body = ErrorResponse),
        (status = 500, description = "Normalization failed", body = ErrorResponse)
    )
)]
pub async fn normalize_ingredients(
    State(pipeline): State<AppState>,
    Json(request): Json<IngredientsRequest>,
) -> impl IntoResponse {
    match pipeline.normalize_ingredients(&request.ingredients).await {
        Ok(items) => (
            StatusCode::OK,
            Json(IngredientsResponse {
                ingredients: items.into_iter().map(Into::into).collect(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
