pub mod ingredients;
pub mod instructions;
pub mod parse_recipe;
pub mod shopping_list;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use cartlist_core::PipelineError;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::AppState;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Returns the router for all pipeline endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parse-recipe", post(parse_recipe::parse_recipe))
        .route(
            "/instacart-ingredients",
            post(ingredients::normalize_ingredients),
        )
        .route(
            "/instacart-instructions",
            post(instructions::normalize_instructions),
        )
        .route(
            "/instacart-shopping-list",
            post(shopping_list::create_shopping_list),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        parse_recipe::parse_recipe,
        ingredients::normalize_ingredients,
        instructions::normalize_instructions,
        shopping_list::create_shopping_list,
    ),
    components(schemas(
        ErrorResponse,
        crate::types::LineItem,
        crate::types::Measurement,
        crate::types::Filters,
        parse_recipe::ParseRecipeRequest,
        parse_recipe::ParseRecipeResponse,
        ingredients::IngredientsRequest,
        ingredients::IngredientsResponse,
        instructions::InstructionsRequest,
        instructions::InstructionsResponse,
        shopping_list::ShoppingListRequest,
    ))
)]
pub struct ApiDoc;

/// Generate the OpenAPI spec
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Map a pipeline failure to its HTTP response.
///
/// Partner rejections are relayed with their original status and body so
/// the caller can distinguish a partner validation error from an outage;
/// everything else follows the 400/500 split of the error taxonomy.
pub fn error_response(err: PipelineError) -> Response {
    match err {
        PipelineError::InvalidInput(_) | PipelineError::NoIngredientsFound => {
            tracing::info!(error = %err, "rejected invalid request");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        PipelineError::ExtractionFailed(_) | PipelineError::SchemaExtraction(_) => {
            tracing::error!(error = %err, "pipeline stage failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        PipelineError::Submission {
            status: Some(status),
            body,
        } => {
            tracing::warn!(status = status, "partner rejected shopping list");
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        }
        PipelineError::Submission { status: None, body } => {
            tracing::error!(error = %body, "partner unreachable");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse { error: body }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use cartlist_core::ai::FakeAiClient;
    use cartlist_core::{InstacartClient, InstacartConfig, Pipeline, TaskModels};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(ai: FakeAiClient, partner_url: String) -> Router {
        let instacart = InstacartClient::new(InstacartConfig {
            base_url: partner_url,
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        let pipeline = Arc::new(Pipeline::new(Arc::new(ai), instacart, TaskModels::default()));
        Router::new().merge(super::router()).with_state(pipeline)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    const BREAD_PAGE: &str = r#"<html><head><script type="application/ld+json">{
        "@type": "Recipe",
        "name": "Bread",
        "recipeIngredient": ["2 cups flour", "1 tsp salt"],
        "recipeInstructions": "Mix everything. Bake at 450F."
    }</script></head><body></body></html>"#;

    #[tokio::test]
    async fn parse_recipe_returns_extracted_fields() {
        let app = app(FakeAiClient::new(), "http://127.0.0.1:1".to_string());
        let (status, body) = post_json(
            app,
            "/parse-recipe",
            json!({"html": BREAD_PAGE, "url": "https://example.com/bread"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Bread");
        assert_eq!(body["ingredients"], json!(["2 cups flour", "1 tsp salt"]));
        assert_eq!(body["instructions"], "Mix everything. Bake at 450F.");
    }

    #[tokio::test]
    async fn parse_recipe_rejects_zero_ingredient_pages() {
        let html = r#"<html><head><script type="application/ld+json">{
            "@type": "Recipe", "name": "Mystery", "recipeIngredient": [],
            "recipeInstructions": "Cook it."
        }</script></head><body></body></html>"#;

        let app = app(FakeAiClient::new(), "http://127.0.0.1:1".to_string());
        let (status, body) = post_json(
            app,
            "/parse-recipe",
            json!({"html": html, "url": "https://example.com/mystery"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No ingredients found.");
    }

    #[tokio::test]
    async fn parse_recipe_rejects_empty_html() {
        let app = app(FakeAiClient::new(), "http://127.0.0.1:1".to_string());
        let (status, _) = post_json(
            app,
            "/parse-recipe",
            json!({"html": "", "url": "https://example.com/x"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ingredients_endpoint_returns_line_items() {
        let ai = FakeAiClient::with_response(
            "2 cups flour",
            r#"{"ingredients": [
                {"name": "flour", "quantity": 2.0, "unit": "cup"},
                {"name": "salt", "quantity": 1.0, "unit": "teaspoon"}
            ]}"#,
        );
        let app = app(ai, "http://127.0.0.1:1".to_string());
        let (status, body) = post_json(
            app,
            "/instacart-ingredients",
            json!({"ingredients": ["2 cups flour", "1 tsp salt"]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ingredients"][0]["name"], "flour");
        assert_eq!(body["ingredients"][1]["name"], "salt");
    }

    #[tokio::test]
    async fn ingredients_endpoint_rejects_empty_input() {
        let app = app(FakeAiClient::new(), "http://127.0.0.1:1".to_string());
        let (status, body) =
            post_json(app, "/instacart-ingredients", json!({"ingredients": []})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No ingredients provided.");
    }

    #[tokio::test]
    async fn ingredients_endpoint_maps_model_failure_to_500() {
        let app = app(FakeAiClient::new(), "http://127.0.0.1:1".to_string());
        let (status, _) = post_json(
            app,
            "/instacart-ingredients",
            json!({"ingredients": ["2 cups flour"]}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn instructions_endpoint_returns_steps() {
        let ai = FakeAiClient::with_response(
            "mix everything",
            r#"{"instructions": ["Mix everything.", "Bake at 450F."]}"#,
        );
        let app = app(ai, "http://127.0.0.1:1".to_string());
        let (status, body) = post_json(
            app,
            "/instacart-instructions",
            json!({"instructions": "Mix everything. Bake at 450F."}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["instructions"],
            json!(["Mix everything.", "Bake at 450F."])
        );
    }

    #[tokio::test]
    async fn instructions_endpoint_rejects_empty_input() {
        let app = app(FakeAiClient::new(), "http://127.0.0.1:1".to_string());
        let (status, _) =
            post_json(app, "/instacart-instructions", json!({"instructions": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shopping_list_relays_partner_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/idp/v1/products/products_link")
            .with_status(200)
            .with_body(r#"{"products_link_url": "https://partner.example/list/abc"}"#)
            .create_async()
            .await;

        let app = app(FakeAiClient::new(), server.url());
        let (status, body) = post_json(
            app,
            "/instacart-shopping-list",
            json!({
                "title": "Bread",
                "ingredients": [{"name": "flour", "quantity": 2.0, "unit": "cup"}]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["products_link_url"],
            "https://partner.example/list/abc"
        );
    }

    #[tokio::test]
    async fn shopping_list_rejects_missing_title() {
        let app = app(FakeAiClient::new(), "http://127.0.0.1:1".to_string());
        let (status, body) = post_json(
            app,
            "/instacart-shopping-list",
            json!({
                "title": "",
                "ingredients": [{"name": "flour"}]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No title provided.");
    }

    #[tokio::test]
    async fn shopping_list_mirrors_partner_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/idp/v1/products/products_link")
            .with_status(422)
            .with_body(r#"{"error":"invalid line item"}"#)
            .create_async()
            .await;

        let app = app(FakeAiClient::new(), server.url());
        let (status, body) = post_json(
            app,
            "/instacart-shopping-list",
            json!({
                "title": "Bread",
                "ingredients": [{"name": "flour"}]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "invalid line item");
    }

    #[tokio::test]
    async fn shopping_list_maps_unreachable_partner_to_502() {
        let app = app(FakeAiClient::new(), "http://127.0.0.1:1".to_string());
        let (status, _) = post_json(
            app,
            "/instacart-shopping-list",
            json!({
                "title": "Bread",
                "ingredients": [{"name": "flour"}]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
