//! Product catalog and shopping cart request/response types.

use serde::{Deserialize, Serialize};

use crate::db::record::Record;

/// Query string for `GET /api/products/list`.
///
/// Both filters are required. They are read as raw strings so that a
/// missing or non-numeric value produces a descriptive 400.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub pet_type: Option<String>,
}

/// Query string for `GET /api/shopping-categories/search`.
///
/// Every filter is optional. Empty strings are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ProductSearchQuery {
    pub category_id: Option<String>,
    pub pet_type_id: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
}

/// Query string for `GET /api/products/cart`.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub username: Option<String>,
}

/// Request body for adding a product to a cart.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "demo",
///   "product_id": 3,
///   "quantity": 2
/// }
/// ```
///
/// `quantity` defaults to 1. Adding a product already in the cart
/// increases the existing line instead of creating a second one.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub username: Option<String>,
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
}

/// Request body for removing a cart line.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub cart_id: Option<i32>,
}

/// Request body for changing a cart line quantity.
///
/// A quantity of zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub cart_id: Option<i32>,
    pub quantity: Option<i32>,
}

/// Cart contents with the sum of every line's `total_price`.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<Record>,
    pub total: f64,
}

/// Generic acknowledgement for cart mutations.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
