//! Product endpoints, one route per caching strategy

use axum::{extract::State, routing::get, Json, Router};

use super::state::AppState;
use super::types::{ApiError, Path};
use crate::domain::product::Product;
use crate::infrastructure::services::CacheStrategy;

pub fn create_products_router() -> Router<AppState> {
    Router::new()
        .route("/nocache", get(list_uncached))
        .route("/memory-cache", get(list_local))
        .route("/distributed-cache", get(list_distributed))
        .route("/memory-cache/{id}", get(get_local))
        .route("/distributed-cache/{id}", get(get_distributed))
        .route("/memory-cache/category/{category}", get(category_local))
        .route("/distributed-cache/category/{category}", get(category_distributed))
}

async fn list_uncached(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    list(&state, CacheStrategy::NoCache).await
}

async fn list_local(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    list(&state, CacheStrategy::Local).await
}

async fn list_distributed(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    list(&state, CacheStrategy::Distributed).await
}

async fn get_local(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
    by_id(&state, CacheStrategy::Local, id).await
}

async fn get_distributed(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
    by_id(&state, CacheStrategy::Distributed, id).await
}

async fn category_local(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    by_category(&state, CacheStrategy::Local, &category).await
}

async fn category_distributed(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    by_category(&state, CacheStrategy::Distributed, &category).await
}

async fn list(state: &AppState, strategy: CacheStrategy) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.product_service.get_all(strategy).await?;
    Ok(Json(products))
}

async fn by_id(state: &AppState, strategy: CacheStrategy, id: i32) -> Result<Json<Product>, ApiError> {
    let product = state.product_service.get_by_id(strategy, id).await?;
    Ok(Json(product))
}

async fn by_category(
    state: &AppState,
    strategy: CacheStrategy,
    category: &str,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .product_service
        .get_by_category(strategy, category)
        .await?;
    Ok(Json(products))
}
