//! Order route handlers.

use axum::{Json, extract::State};
use serde_json::json;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::NewOrder;
use crate::state::AppState;

/// Create a new order.
///
/// POST /pedidos
///
/// The order row is written first; the notification email is then handed
/// to an independent task. The response never waits on the notification
/// and a notification failure never alters the order-creation result.
#[instrument(skip(state, input), fields(customer = %input.customer_name, product_id = %input.product_id))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewOrder>,
) -> Result<Json<serde_json::Value>> {
    validate_new_order(&input)?;

    let repo = OrderRepository::new(state.pool());
    let order = repo.create(&input).await?;
    tracing::info!(id = %order.id, "Order created");

    // Best-effort notification, off the critical path. The task owns an
    // immutable snapshot of the order; failures are logged and swallowed.
    if let Some(email) = state.email() {
        let email = email.clone();
        let snapshot = order.clone();
        tokio::spawn(async move {
            if let Err(e) = email.send_order_notification(&snapshot).await {
                tracing::warn!(order_id = %snapshot.id, error = %e, "Order notification failed");
            }
        });
    }

    Ok(Json(json!({
        "id": order.id,
        "message": format!(
            "Pedido #{} registrado correctamente. Nos contactaremos pronto!",
            order.id
        ),
    })))
}

/// List all orders, newest first.
///
/// GET /pedidos
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list().await?;
    Ok(Json(json!({ "pedidos": orders })))
}

/// Request-shape checks applied before the store is touched.
fn validate_new_order(input: &NewOrder) -> Result<()> {
    if input.customer_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "customer_name must not be empty".to_string(),
        ));
    }
    if input.customer_phone.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "customer_phone must not be empty".to_string(),
        ));
    }
    if input.quantity <= 0 {
        return Err(AppError::InvalidInput(
            "quantity must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
