//! Happy Tails pet store REST API.
//!
//! Pet adoption, a product catalog with a shopping cart, order placement,
//! a veterinarian directory and user accounts, served over axum on top of
//! a PostgreSQL connection pool.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
