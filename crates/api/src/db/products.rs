//! Product repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use mayorista_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, price, description, image_url, category, \
     stock, wholesale_price, wholesale_minimum_qty, active, created_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List products filtered by `active`, optionally narrowed to one
    /// category, newest first.
    ///
    /// Returns the full matching set; there is no pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<&str>,
        active: bool,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = match category {
            Some(category) => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE active = ?1 AND category = ?2 ORDER BY id DESC"
                ))
                .bind(active)
                .bind(category)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = ?1 ORDER BY id DESC"
                ))
                .bind(active)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matches.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Insert a new product, letting `SQLite` assign the identity key.
    ///
    /// All supplied fields are stored verbatim. Duplicate names are
    /// permitted; there is deliberately no uniqueness constraint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products \
             (name, price, description, image_url, category, stock, \
              wholesale_price, wholesale_minimum_qty, active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(&input.category)
        .bind(input.stock)
        .bind(input.wholesale_price)
        .bind(input.wholesale_minimum_qty)
        .bind(input.active)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Unconditionally overwrite a product's image URL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id is unknown; no write
    /// happens in that case.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_image(&self, id: ProductId, url: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET image_url = ?1 WHERE id = ?2")
            .bind(url)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Permanently remove a product row.
    ///
    /// Orders referencing this id are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id is unknown.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Distinct category labels among active products, sorted ascending.
    ///
    /// Categories are stored as-is; values differing only in case or
    /// whitespace are distinct labels here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products WHERE active = 1 ORDER BY category ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }
}
