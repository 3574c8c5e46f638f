//! Pet catalog and adoption request/response types.

use serde::{Deserialize, Serialize};

/// Request body for adopting a pet.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "demo",
///   "breed_id": 1,
///   "store_id": 2
/// }
/// ```
///
/// All fields are required; they are optional here so a missing field
/// is reported as 400 "Missing required fields" instead of a parse error.
#[derive(Debug, Deserialize)]
pub struct AdoptRequest {
    pub username: Option<String>,
    pub breed_id: Option<i32>,
    pub store_id: Option<i32>,
}

/// Response body for a completed adoption.
///
/// ```json
/// { "success": true, "pet_id": 42 }
/// ```
#[derive(Debug, Serialize)]
pub struct AdoptionResponse {
    pub success: bool,
    pub pet_id: i32,
}

/// Pet created by an adoption.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Pet {
    pub pet_id: i32,
    pub pet_type_id: i32,
    pub gender: String,
    pub age: i32,
    pub breed_id: i32,
    pub owner: Option<String>,
}

/// Response body for the breed image lookup.
#[derive(Debug, Serialize)]
pub struct BreedImageResponse {
    pub image_url: String,
}
