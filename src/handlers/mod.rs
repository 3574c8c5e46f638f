//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, query string)
//! 2. Validates it and runs the database work
//! 3. Returns a JSON response or an [`AppError`](crate::error::AppError)

pub mod cart;
pub mod categories;
pub mod health;
pub mod orders;
pub mod pets;
pub mod products;
pub mod users;
pub mod vets;

/// Treat an empty or whitespace-only parameter as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
