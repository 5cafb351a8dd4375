//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Health check
//!
//! # Catalog
//! GET    /api/products                 - Shop listing (page, sort, category, availability)
//! GET    /api/products/popular         - Popular products
//! GET    /api/products/{id}            - Product detail
//! GET    /api/categories               - Category slugs
//! GET    /api/search?q=                - Search (min 2 characters)
//!
//! # Favorites
//! GET    /api/favorites                - Favorites
//! POST   /api/favorites/toggle         - Toggle a product summary
//! DELETE /api/favorites                - Clear favorites
//!
//! # Cart
//! GET    /api/cart                     - Cart with subtotal and item count
//! POST   /api/cart/items               - Add a product summary
//! PATCH  /api/cart/items/{id}          - Set quantity (clamped to 1)
//! DELETE /api/cart/items/{id}          - Remove entry
//! DELETE /api/cart                     - Clear cart
//! POST   /api/cart/from-favorite/{id}  - Add a favorite to the cart
//!
//! # My ads
//! GET    /api/myads                    - Stored listings, newest first
//! POST   /api/myads                    - Publish a listing
//! GET    /api/myads/{id}               - One listing
//! PUT    /api/myads/{id}               - Update a listing
//! DELETE /api/myads/{id}               - Delete a listing
//! GET    /api/myads/draft              - Saved form
//! PUT    /api/myads/draft              - Save form
//! DELETE /api/myads/draft              - Discard form
//! ```

pub mod cart;
pub mod favorites;
pub mod myads;
pub mod products;

use std::any::Any;

use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::DISPATCH_FAILED_MESSAGE;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the catalog browsing routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/popular", get(products::popular))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/search", get(products::search))
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::show).delete(favorites::clear))
        .route("/toggle", post(favorites::toggle))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
        .route("/from-favorite/{id}", post(cart::add_from_favorite))
}

/// Create the "my ads" routes router.
pub fn myads_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(myads::index).post(myads::create))
        .route(
            "/draft",
            get(myads::show_draft)
                .put(myads::save_draft)
                .delete(myads::discard_draft),
        )
        .route(
            "/{id}",
            get(myads::show).put(myads::update).delete(myads::delete),
        )
}

/// Create all JSON API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(product_routes())
        .nest("/favorites", favorites_routes())
        .nest("/cart", cart_routes())
        .nest("/myads", myads_routes())
        // Cart and favorites change on every call
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// Build the storefront application with its middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Generic 500 for a handler panic. The panic payload is not exposed.
fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": DISPATCH_FAILED_MESSAGE })),
    )
        .into_response()
}
