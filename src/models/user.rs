//! User account models and API request/response types.
//!
//! This module defines:
//! - `User`: the canonical `users` row
//! - Request bodies for login, registration and profile updates
//! - Response bodies returned by the user endpoints

use serde::{Deserialize, Serialize};

use crate::db::record::Record;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. `password` holds either an Argon2id PHC string
/// (`$argon2id$...`) or, for seeded/legacy rows, the cleartext value.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Request body for `POST /api/users/login`.
///
/// ```json
/// { "username": "demo", "password": "demo123" }
/// ```
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /api/users/register`.
///
/// ```json
/// { "username": "newbie", "password": "s3cret", "email": "newbie@example.com" }
/// ```
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Request body for `PUT /api/users/profile/{username}`.
///
/// `name`, `email`, `phone` and `city` are required. `password` is only
/// changed when present and non-empty.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub success: bool,
    pub username: String,
}

/// Profile view with the user's orders and adopted pets.
///
/// The stored password is never part of this response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub orders: Vec<Record>,
    pub pets: Vec<Record>,
}

impl ProfileResponse {
    pub fn new(user: User, orders: Vec<Record>, pets: Vec<Record>) -> Self {
        Self {
            username: user.username,
            email: user.email,
            name: user.name,
            phone: user.phone,
            address: user.address,
            city: user.city,
            state: user.state,
            orders,
            pets,
        }
    }
}
