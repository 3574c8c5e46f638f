//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and complex operations.

pub mod adoption_service;
pub mod breed_image;
pub mod order_service;
pub mod password;
