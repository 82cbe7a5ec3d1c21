//! HTTP API server for the shopping cart service.
//!
//! Exposes cart, checkout and catalog endpoints over the domain's
//! `CartService`, with structured logging (tracing) and Prometheus metrics.

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use domain::{CartService, InMemoryStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/products", get(routes::products::list))
        .route("/api/carts", post(routes::carts::create))
        .route("/api/carts/{id}", get(routes::carts::get))
        .route("/api/carts/{id}/items", post(routes::carts::add_item))
        .route(
            "/api/carts/{id}/items/{product_id}",
            put(routes::carts::update_item).delete(routes::carts::remove_item),
        )
        .route("/api/carts/{id}/checkout", post(routes::carts::checkout))
        .route(
            "/api/sessions/{session_id}/cart",
            get(routes::carts::get_by_session),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over an in-memory store.
///
/// The store is returned as well so callers can seed or inspect it.
pub fn create_default_state(config: &Config) -> (Arc<AppState>, InMemoryStore) {
    let store = InMemoryStore::new();
    let state = Arc::new(AppState {
        cart_service: CartService::new(store.repositories()),
        default_currency: config.default_currency.clone(),
    });
    (state, store)
}

/// Registers descriptions for the metrics the service records.
pub fn describe_metrics() {
    metrics::describe_counter!("carts_created_total", "Carts opened");
    metrics::describe_counter!("cart_items_added_total", "Units added to carts");
    metrics::describe_counter!("cart_items_updated_total", "Cart item quantity changes");
    metrics::describe_counter!("cart_items_removed_total", "Items removed from carts");
    metrics::describe_counter!("checkouts_total", "Orders placed");
    metrics::describe_counter!("checkout_failures_total", "Failed checkouts, by error kind");
    metrics::describe_histogram!(
        "checkout_duration_seconds",
        metrics::Unit::Seconds,
        "Checkout latency"
    );
}
