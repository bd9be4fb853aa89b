use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::{
    app::AppState,
    catalog::{CatalogError, NewProduct, ProductRecord, ProductUpdate, RELATED_PRODUCTS_LIMIT},
    category::{Category, CategoryDetails},
};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PopularParams {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ProductDetails {
    #[serde(flatten)]
    product: ProductRecord,
    related: Vec<ProductRecord>,
}

#[derive(Debug, Serialize)]
struct CategorySummary {
    category: Category,
    details: &'static CategoryDetails,
    product_count: usize,
}

/// GET /v1/products/search?q=&limit=
pub(crate) async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    state.telemetry().metrics().catalog_searches.inc();
    let limit = params
        .limit
        .unwrap_or_else(|| state.config().search_result_limit());
    let results = state.catalog().search_limited(&params.q, limit);
    Json(results).into_response()
}

/// GET /v1/products?category=
pub(crate) async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    match params.category.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => match raw.parse::<Category>() {
            Ok(category) => Json(state.catalog().get_products_by_category(category)).into_response(),
            Err(error) => error_response(StatusCode::BAD_REQUEST, error.to_string(), false),
        },
        None => Json(state.catalog().all_products()).into_response(),
    }
}

/// GET /v1/products/popular
pub(crate) async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Response {
    let limit = params
        .limit
        .unwrap_or_else(|| state.config().popular_products_limit());
    Json(state.catalog().get_popular_products(limit)).into_response()
}

/// GET /v1/products/{id}
pub(crate) async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let catalog = state.catalog();
    match catalog.get_product_by_id(&id) {
        Some(product) => Json(ProductDetails {
            related: catalog.get_related_products(&id, RELATED_PRODUCTS_LIMIT),
            product,
        })
        .into_response(),
        None => not_found(&id),
    }
}

/// POST /v1/products
pub(crate) async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Response {
    match state.catalog().add_product(payload) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(error @ CatalogError::DuplicateId(_)) => {
            error_response(StatusCode::CONFLICT, error.to_string(), false)
        }
        Err(error @ CatalogError::EmptyName) => {
            error_response(StatusCode::BAD_REQUEST, error.to_string(), false)
        }
    }
}

/// PUT /v1/products/{id}
pub(crate) async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> Response {
    match state.catalog().update_product(&id, payload) {
        Ok(Some(product)) => Json(product).into_response(),
        Ok(None) => not_found(&id),
        Err(error) => error_response(StatusCode::BAD_REQUEST, error.to_string(), false),
    }
}

/// DELETE /v1/products/{id}
pub(crate) async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.catalog().delete_product(&id) {
        Some(product) => Json(product).into_response(),
        None => not_found(&id),
    }
}

/// GET /v1/categories
pub(crate) async fn categories(State(state): State<AppState>) -> Response {
    let catalog = state.catalog();
    let summaries: Vec<CategorySummary> = catalog
        .get_categories()
        .into_iter()
        .map(|category| CategorySummary {
            category,
            details: category.details(),
            product_count: catalog.get_products_by_category(category).len(),
        })
        .collect();
    Json(summaries).into_response()
}

/// GET /v1/stats
pub(crate) async fn stats(State(state): State<AppState>) -> Response {
    Json(state.catalog().get_recycling_stats()).into_response()
}

fn not_found(id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("product not found: {id}"),
        false,
    )
}
