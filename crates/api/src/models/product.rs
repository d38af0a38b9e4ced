//! Product model and creation input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mayorista_core::ProductId;

/// A catalog product with retail and wholesale pricing.
///
/// `stock` is `None` for untracked products (not zero). `wholesale_price`
/// should stay at or below `price` but this is not enforced: the store
/// persists whatever the caller supplies, matching the documented
/// weak-invariant behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Retail unit price. Stored as SQLite `REAL`.
    pub price: f64,
    pub description: String,
    /// Opaque URL, stored verbatim; the service never fetches or decodes it.
    pub image_url: String,
    /// Freeform label used for filtering; no normalization is applied.
    pub category: String,
    pub stock: Option<i64>,
    pub wholesale_price: Option<f64>,
    /// Quantity threshold at which wholesale pricing applies.
    pub wholesale_minimum_qty: i64,
    /// Inactive products are excluded from default listings but not deleted.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product. Defaults are applied at this boundary,
/// before the row ever reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    pub category: String,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub wholesale_price: Option<f64>,
    /// Defaults to 1 when absent.
    #[serde(default = "default_wholesale_minimum_qty")]
    pub wholesale_minimum_qty: i64,
    /// Defaults to true when absent.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_wholesale_minimum_qty() -> i64 {
    1
}

const fn default_active() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_defaults() {
        let input: NewProduct = serde_json::from_str(
            r#"{
                "name": "Gorro Rojo",
                "price": 2500,
                "description": "Gorro de lana",
                "image_url": "http://x/y.jpg",
                "category": "Gorros"
            }"#,
        )
        .unwrap();

        assert_eq!(input.wholesale_minimum_qty, 1);
        assert!(input.active);
        assert_eq!(input.stock, None);
        assert_eq!(input.wholesale_price, None);
    }

    #[test]
    fn test_new_product_explicit_fields() {
        let input: NewProduct = serde_json::from_str(
            r#"{
                "name": "Gorro Polar",
                "price": 2200.5,
                "description": "",
                "image_url": "http://x/z.jpg",
                "category": "Gorros",
                "stock": 30,
                "wholesale_price": 1800,
                "wholesale_minimum_qty": 5,
                "active": false
            }"#,
        )
        .unwrap();

        assert_eq!(input.stock, Some(30));
        assert_eq!(input.wholesale_price, Some(1800.0));
        assert_eq!(input.wholesale_minimum_qty, 5);
        assert!(!input.active);
    }

    #[test]
    fn test_new_product_missing_required_field_rejected() {
        let result: Result<NewProduct, _> =
            serde_json::from_str(r#"{"name": "Gorro", "price": 100}"#);
        assert!(result.is_err());
    }
}
