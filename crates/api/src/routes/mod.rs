//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - API index
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (DB ping)
//!
//! # Auth
//! POST   /auth/register             - Register, returns token
//! POST   /auth/login                - Login, returns token
//! GET    /auth/me                   - Current user (token)
//!
//! # Products
//! GET    /products                  - List products (public)
//! GET    /products/{id}             - Product detail (public)
//! POST   /products                  - Create product (admin)
//! PUT    /products/{id}             - Update product (admin)
//! DELETE /products/{id}             - Delete product (admin)
//!
//! # Cart (token)
//! GET    /cart                      - Get own cart (created lazily)
//! POST   /cart/add                  - Add item, quantities merge
//! PUT    /cart/update               - Replace quantity (<= 0 removes)
//! DELETE /cart/remove/{productId}   - Remove item (idempotent)
//! DELETE /cart/clear                - Empty the cart (checkout)
//! ```
//!
//! Unknown routes fall through to a 404 in the standard
//! `{success:false, message}` envelope.

pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// API index payload listing the available endpoints.
#[derive(Debug, Serialize)]
struct ApiIndex {
    message: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
struct Endpoints {
    auth: &'static [&'static str],
    products: &'static [&'static str],
    cart: &'static [&'static str],
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get))
        .route("/add", post(cart::add))
        .route("/update", put(cart::update))
        .route("/remove/{product_id}", delete(cart::remove))
        .route("/clear", delete(cart::clear))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .fallback(not_found)
}

/// API index.
async fn index() -> Json<ApiIndex> {
    Json(ApiIndex {
        message: "Tamarind API is running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            auth: &["/auth/register", "/auth/login", "/auth/me"],
            products: &["/products", "/products/{id}"],
            cart: &[
                "/cart",
                "/cart/add",
                "/cart/update",
                "/cart/remove/{id}",
                "/cart/clear",
            ],
        },
    })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Fallback for unknown routes.
async fn not_found() -> (StatusCode, Json<crate::error::ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(crate::error::ErrorBody {
            success: false,
            message: "Route not found".to_string(),
        }),
    )
}
