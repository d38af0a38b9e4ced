//! HTTP route handlers for the catalog/order API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Service descriptor
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the database)
//!
//! # Products
//! GET    /productos                 - List products (?categoria=&activo=)
//! GET    /productos/{id}            - Get one product
//! POST   /productos                 - Create product
//! DELETE /productos/{id}            - Hard-delete product
//! GET    /categorias                - Distinct active categories
//!
//! # Images
//! POST /upload-image                - Multipart upload, relayed to the media host
//! POST /actualizar-imagen-producto  - Overwrite a product's image URL
//!
//! # Orders
//! POST /pedidos                     - Create order (fires notification email)
//! GET  /pedidos                     - List all orders
//! ```

pub mod media;
pub mod orders;
pub mod products;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::json;

use crate::state::AppState;

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/productos", get(products::index).post(products::create))
        .route(
            "/productos/{id}",
            get(products::show).delete(products::destroy),
        )
        .route("/categorias", get(products::categories))
        .route("/upload-image", post(media::upload_image))
        .route(
            "/actualizar-imagen-producto",
            post(media::update_product_image),
        )
        .route("/pedidos", get(orders::index).post(orders::create))
}

/// Service descriptor, mirroring what callers probe to discover the API.
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "mensaje": "API E-commerce Mayorista funcionando correctamente",
        "features": ["Upload de imágenes", "Gestión de stock", "Precios mayoristas"],
        "endpoints": ["/productos", "/pedidos", "/upload-image", "/categorias"],
    }))
}

/// Liveness health check endpoint.
///
/// Does not check dependencies.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
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
