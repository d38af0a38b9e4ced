//! Order repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::order::DEFAULT_ORDER_STATUS;
use crate::models::{NewOrder, Order};

const ORDER_COLUMNS: &str = "id, customer_name, customer_phone, customer_email, \
     product_id, product_name, quantity, comments, created_at, status";

/// Repository for order database operations.
///
/// Orders are append-only through this API: creation and bulk listing are
/// the only operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new order with the default `"pending"` status.
    ///
    /// `product_id` is stored as supplied, whether or not such a product
    /// exists; `product_name` is the caller's snapshot of the name at
    /// order time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewOrder) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders \
             (customer_name, customer_phone, customer_email, product_id, \
              product_name, quantity, comments, created_at, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&input.customer_name)
        .bind(&input.customer_phone)
        .bind(input.customer_email.as_deref())
        .bind(input.product_id)
        .bind(&input.product_name)
        .bind(input.quantity)
        .bind(&input.comments)
        .bind(Utc::now())
        .bind(DEFAULT_ORDER_STATUS)
        .fetch_one(self.pool)
        .await?;

        Ok(order)
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }
}
