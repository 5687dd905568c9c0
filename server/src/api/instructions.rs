use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::{error_response, ErrorResponse};
use crate::AppState;

/// Request body for instruction segmentation
#[derive(Debug, Deserialize, ToSchema)]
pub struct InstructionsRequest {
    /// Instructions as a single free-text blob
    pub instructions: String,
}

/// Discrete instruction steps
#[derive(Debug, Serialize, ToSchema)]
pub struct InstructionsResponse {
    pub instructions: Vec<String>,
}

/// Segment a free-text instruction blob into discrete steps
#[utoipa::path(
    post,
    path = "/instacart-instructions",
    tag = "normalize",
    request_body = InstructionsRequest,
    responses(
        (status = 200, description = "Discrete instruction steps", body = InstructionsResponse),
        (status = 400, description = "No instructions provided", body = ErrorResponse),
        (status = 500, description = "Normalization failed", body = ErrorResponse)
    )
)]
pub async fn normalize_instructions(
    State(pipeline): State<AppState>,
    Json(request): Json<InstructionsRequest>,
) -> impl IntoResponse {
    match pipeline.normalize_instructions(&request.instructions).await {
        Ok(steps) => (
            StatusCode::OK,
            Json(InstructionsResponse {
                instructions: steps,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
