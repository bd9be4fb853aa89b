pub(crate) mod classify;
pub(crate) mod health;
pub(crate) mod metrics;
pub(crate) mod products;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::app::AppState;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics::exporter))
        .route("/v1/classify/text", post(classify::classify_text))
        .route("/v1/classify/image", post(classify::classify_image))
        .route("/v1/products/search", get(products::search))
        .route("/v1/products/popular", get(products::popular))
        .route(
            "/v1/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/v1/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/v1/categories", get(products::categories))
        .route("/v1/stats", get(products::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    error: String,
    retryable: bool,
}

pub(crate) fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    retryable: bool,
) -> Response {
    let body = Json(ErrorResponse {
        error: message.into(),
        retryable,
    });
    (status, body).into_response()
}
