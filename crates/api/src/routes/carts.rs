//! Cart and checkout endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{
    AddItemToCart, Aggregate, CartDto, CheckoutCart, CreateCart, GetCart, RemoveItemFromCart,
    UpdateCartItemQuantity,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartRequest {
    pub session_id: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_email: String,
    pub customer_name: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreatedResponse {
    pub cart_id: String,
    pub session_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
}

// -- Handlers --

/// POST /api/carts: open an empty cart. The body is optional.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    req: Result<Option<Json<CreateCartRequest>>, JsonRejection>,
) -> Result<(StatusCode, Json<CartCreatedResponse>), ApiError> {
    let req = req?.map(|Json(req)| req).unwrap_or_default();
    let currency = req
        .currency
        .unwrap_or_else(|| state.default_currency.clone());
    let cart = state
        .cart_service
        .create_cart(CreateCart::new(req.session_id, currency))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CartCreatedResponse {
            cart_id: cart.id().to_string(),
            session_id: cart.session_id().map(str::to_string),
        }),
    ))
}

/// GET /api/carts/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CartDto>, ApiError> {
    load(&state, id).await.map(Json)
}

/// GET /api/sessions/{session_id}/cart
#[tracing::instrument(skip(state))]
pub async fn get_by_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<CartDto>, ApiError> {
    state
        .cart_service
        .get_cart_by_session(&session_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No cart for session {session_id}")))
}

/// POST /api/carts/{id}/items: add units of a product.
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    req: Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<Json<CartDto>, ApiError> {
    let Json(req) = req?;
    state
        .cart_service
        .add_item(AddItemToCart::new(&id, req.product_id, req.quantity))
        .await?;
    load(&state, id).await.map(Json)
}

/// PUT /api/carts/{id}/items/{product_id}: set the quantity of an item.
#[tracing::instrument(skip(state, req))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path((id, product_id)): Path<(String, String)>,
    req: Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> Result<Json<CartDto>, ApiError> {
    let Json(req) = req?;
    state
        .cart_service
        .update_item_quantity(UpdateCartItemQuantity::new(&id, product_id, req.quantity))
        .await?;
    load(&state, id).await.map(Json)
}

/// DELETE /api/carts/{id}/items/{product_id}
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((id, product_id)): Path<(String, String)>,
) -> Result<Json<CartDto>, ApiError> {
    state
        .cart_service
        .remove_item(RemoveItemFromCart::new(&id, product_id))
        .await?;
    load(&state, id).await.map(Json)
}

/// POST /api/carts/{id}/checkout: place an order and empty the cart.
#[tracing::instrument(skip(state, req))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    req: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let Json(req) = req?;
    let order_id = state
        .cart_service
        .checkout(CheckoutCart::new(id, req.customer_email, req.customer_name))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: order_id.to_string(),
        }),
    ))
}

async fn load(state: &AppState, id: String) -> Result<CartDto, ApiError> {
    state
        .cart_service
        .get_cart(GetCart::new(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Cart {id} not found")))
}
