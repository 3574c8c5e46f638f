//! Order data models and API request/response types.
//!
//! This module defines:
//! - `OrderStatus`: the four lifecycle states an order can be in
//! - Request types for placing orders and changing their status
//! - `OrderTotals`: derived totals for the order detail view

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::record::Record;

/// Sales tax applied to order subtotals.
pub const TAX_RATE: f64 = 0.08;

/// Lifecycle state of an order.
///
/// Stored as its display name in `orders.status`, which carries a matching
/// `CHECK` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four statuses.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownStatus;

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    /// Exact, case-sensitive match on the stored names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownStatus),
        }
    }
}

/// Request body for placing an order from the user's cart.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "demo",
///   "store_id": 1
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub username: Option<String>,
    pub store_id: Option<i32>,
}

/// Response for a placed order.
#[derive(Debug, Serialize)]
pub struct OrderPlacedResponse {
    pub success: bool,
    pub order_id: i32,
}

/// Request body for `PUT /api/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Response for a status change.
#[derive(Debug, Serialize)]
pub struct StatusUpdatedResponse {
    pub success: bool,
    pub order_id: i32,
    pub status: OrderStatus,
}

/// One cart line being converted into an order line.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// Totals derived from an order's line items.
///
/// Each item record must carry a numeric `quantity` and `total_price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTotals {
    pub total_items: i64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl OrderTotals {
    pub fn from_items(items: &[Record]) -> Self {
        let total_items = items
            .iter()
            .filter_map(|item| item.get("quantity").and_then(Value::as_i64))
            .sum();
        let subtotal = round_cents(sum_field(items, "total_price"));
        let tax = round_cents(subtotal * TAX_RATE);

        Self {
            total_items,
            subtotal,
            tax,
            total: round_cents(subtotal + tax),
        }
    }
}

/// Sum a numeric field across records, ignoring rows where it is missing or null.
pub fn sum_field(records: &[Record], field: &str) -> f64 {
    records
        .iter()
        .filter_map(|record| record.get(field).and_then(Value::as_f64))
        .fold(0.0, |acc, value| acc + value)
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
