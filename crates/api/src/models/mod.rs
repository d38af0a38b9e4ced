//! Domain models for the catalog/order API.

pub mod order;
pub mod product;

pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product};
