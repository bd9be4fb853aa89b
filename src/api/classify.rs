use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::error_response;
use crate::{
    app::AppState,
    category::MaterialTag,
    orchestrator::{ClassificationResult, ClassifyError, TextInput},
};

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyTextRequest {
    #[serde(default)]
    description: String,
    #[serde(default)]
    product_name: String,
    #[serde(default)]
    material: Option<MaterialTag>,
    #[serde(default)]
    selected_product_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyImageRequest {
    image_base64: String,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    request_id: Uuid,
    #[serde(flatten)]
    result: ClassificationResult,
}

/// POST /v1/classify/text
pub(crate) async fn classify_text(
    State(state): State<AppState>,
    Json(payload): Json<ClassifyTextRequest>,
) -> Response {
    let request_id = Uuid::new_v4();

    let selected_id = payload
        .selected_product_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let selected_product = match selected_id {
        Some(id) => match state.catalog().get_product_by_id(id) {
            Some(product) => Some(product),
            None => {
                info!(%request_id, product_id = id, "selected product not found");
                return error_response(
                    StatusCode::NOT_FOUND,
                    format!("product not found: {id}"),
                    false,
                );
            }
        },
        None => None,
    };

    let input = TextInput {
        description: payload.description,
        product_name: payload.product_name,
        material: payload.material,
        selected_product,
    };

    respond(request_id, state.orchestrator().classify_text(input))
}

/// POST /v1/classify/image
pub(crate) async fn classify_image(
    State(state): State<AppState>,
    Json(payload): Json<ClassifyImageRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    let outcome = state
        .orchestrator()
        .classify_image_base64(&payload.image_base64)
        .await;
    respond(request_id, outcome)
}

fn respond(request_id: Uuid, outcome: Result<ClassificationResult, ClassifyError>) -> Response {
    match outcome {
        Ok(result) => (StatusCode::OK, Json(ClassifyResponse { request_id, result })).into_response(),
        Err(error @ ClassifyError::InvalidInput(_)) => {
            info!(%request_id, %error, "classification request rejected");
            error_response(StatusCode::BAD_REQUEST, error.to_string(), false)
        }
        Err(error) => {
            error!(%request_id, error = ?error, "classification failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                error.to_string(),
                error.is_retryable(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    use super::*;
    use crate::api::test_support::{app, json_request, send};

    #[tokio::test]
    async fn classify_text_returns_keyword_result() {
        let (status, body) = send(
            app(),
            json_request(
                "POST",
                "/v1/classify/text",
                &serde_json::json!({ "description": "empty water bottle" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "plastic");
        assert_eq!(body["confidence"], 0.85);
        assert_eq!(body["confidence_level"], "high");
        assert_eq!(body["source"], "keyword_text");
        assert!(body["request_id"].as_str().is_some());
        assert_eq!(
            body["disposal_instructions"].as_array().map(Vec::len),
            Some(5)
        );
    }

    #[tokio::test]
    async fn classify_text_uses_selected_product() {
        let (status, body) = send(
            app(),
            json_request(
                "POST",
                "/v1/classify/text",
                &serde_json::json!({
                    "description": "plastic wrapper",
                    "material": "plastic",
                    "selected_product_id": "aluminum-can"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "metal");
        assert_eq!(body["confidence"], 0.95);
        assert_eq!(body["source"], "catalog_selection");
        assert_eq!(body["product"]["id"], "aluminum-can");
    }

    #[tokio::test]
    async fn unknown_selected_product_is_not_found() {
        let (status, body) = send(
            app(),
            json_request(
                "POST",
                "/v1/classify/text",
                &serde_json::json!({ "selected_product_id": "does-not-exist" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["retryable"], false);
    }

    #[tokio::test]
    async fn empty_text_request_is_bad_request() {
        let (status, body) = send(
            app(),
            json_request(
                "POST",
                "/v1/classify/text",
                &serde_json::json!({ "description": "  ", "product_name": "" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Please provide at least one piece of information about the item"
        );
    }

    #[tokio::test]
    async fn classify_image_without_credentials_uses_local_stage() {
        let (status, body) = send(
            app(),
            json_request(
                "POST",
                "/v1/classify/image",
                &serde_json::json!({ "image_base64": STANDARD.encode(b"fake-jpeg") }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "local_model");
    }

    #[tokio::test]
    async fn classify_image_rejects_bad_payload() {
        let (status, body) = send(
            app(),
            json_request(
                "POST",
                "/v1/classify/image",
                &serde_json::json!({ "image_base64": "***" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["retryable"], false);
    }

    #[test]
    fn failures_map_to_retryable_server_error() {
        let response = respond(
            Uuid::new_v4(),
            Err(ClassifyError::Failed(anyhow::anyhow!("disk on fire"))),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
