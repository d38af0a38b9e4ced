//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use mayorista_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product};
use crate::state::AppState;

/// Listing filter query parameters (Spanish parameter names are part of
/// the public interface).
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub categoria: Option<String>,
    /// Defaults to true: inactive products are excluded unless asked for.
    pub activo: Option<bool>,
}

/// List products with optional filters.
///
/// GET /productos?categoria=&activo=
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.pool());
    let products = repo
        .list(query.categoria.as_deref(), query.activo.unwrap_or(true))
        .await?;
    Ok(Json(products))
}

/// Get a single product.
///
/// GET /productos/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let repo = ProductRepository::new(state.pool());
    let product = repo.get(ProductId::new(id)).await?;
    Ok(Json(product))
}

/// Create a new product.
///
/// POST /productos
#[instrument(skip(state, input), fields(name = %input.name, category = %input.category))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> Result<Json<Product>> {
    validate_new_product(&input)?;

    let repo = ProductRepository::new(state.pool());
    let product = repo.create(&input).await?;

    tracing::info!(id = %product.id, "Product created");
    Ok(Json(product))
}

/// Hard-delete a product.
///
/// DELETE /productos/{id}
///
/// Orders referencing this product keep their snapshot and are untouched.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.pool());
    repo.delete(ProductId::new(id)).await?;

    tracing::info!(id, "Product deleted");
    Ok(Json(json!({
        "message": format!("Producto {id} eliminado correctamente")
    })))
}

/// List distinct categories among active products.
///
/// GET /categorias
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.pool());
    let categories = repo.categories().await?;
    Ok(Json(json!({ "categorias": categories })))
}

/// Request-shape checks applied before the store is touched.
fn validate_new_product(input: &NewProduct) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::InvalidInput("name must not be empty".to_string()));
    }
    if !input.price.is_finite() || input.price < 0.0 {
        return Err(AppError::InvalidInput(
            "price must be a non-negative number".to_string(),
        ));
    }
    if let Some(wholesale_price) = input.wholesale_price
        && (!wholesale_price.is_finite() || wholesale_price < 0.0)
    {
        return Err(AppError::InvalidInput(
            "wholesale_price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}
