use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::{error_response, ErrorResponse};
use crate::types::LineItem;
use crate::AppState;

/// Request body for shopping list submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct ShoppingListRequest {
    pub title: String,
    pub ingredients: Vec<LineItem>,
    /// Discrete instruction steps; omitted entirely from the partner
    /// payload when absent
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Submit a structured shopping list to the partner service
///
/// On success the partner's response body is returned verbatim; it
/// contains the shareable list URL. Partner rejections are mirrored with
/// their original status and body.
#[utoipa::path(
    post,
    path = "/instacart-shopping-list",
    tag = "shopping-list",
    request_body = ShoppingListRequest,
    responses(
        (status = 200, description = "Partner response containing the shareable URL"),
        (status = 400, description = "Missing title or ingredients", body = ErrorResponse),
        (status = 502, description = "Partner unreachable", body = ErrorResponse)
    )
)]
pub async fn create_shopping_list(
    State(pipeline): State<AppState>,
    Json(request): Json<ShoppingListRequest>,
) -> impl IntoResponse {
    let list = cartlist_core::ShoppingList {
        title: request.title,
        ingredients: request.ingredients.into_iter().map(Into::into).collect(),
        instructions: request.instructions,
        image_url: request.image_url,
    };

    match pipeline.submit(&list).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => error_response(e),
    }
}
