//! Order model and creation input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mayorista_core::{OrderId, ProductId};

/// Status assigned to every order written through this API.
///
/// `status` is freeform text with no enforced state machine; this service
/// only ever writes the default.
pub const DEFAULT_ORDER_STATUS: &str = "pending";

/// A customer order.
///
/// Rows are immutable once written: the API exposes only creation and bulk
/// listing. `product_id` is a weak reference (no foreign key) and may point
/// at a product that has since been deleted; `product_name` is a snapshot
/// taken at order time and survives product deletion or rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// Input for creating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    /// Defaults to the empty string when absent.
    #[serde(default)]
    pub comments: String,
}
