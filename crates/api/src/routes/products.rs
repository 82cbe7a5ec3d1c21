//! Catalog listing.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::ProductDto;

use super::AppState;
use crate::error::ApiError;

/// GET /api/products: products with at least one unit in stock.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let products = state.cart_service.list_products_in_stock().await?;
    Ok(Json(products.iter().map(ProductDto::from).collect()))
}
