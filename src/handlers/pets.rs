//! Pet catalog and adoption HTTP handlers.
//!
//! This module implements the pet-related API endpoints:
//! - GET /api/pets/types - Pet types with a short description
//! - GET /api/pets/types/{id}/breeds - Breeds of one pet type
//! - GET /api/pets/breeds/{id} - Breed detail with store availability
//! - GET /api/pets/breeds/{id}/stores - Stores that currently have the breed
//! - GET /api/pets/breeds/{id}/image - Stored or looked-up breed image
//! - GET /api/pets/available - Available animals aggregated per breed
//! - POST /api/pets/adopt - Adopt one animal from a store

use axum::{Json, extract::State};
use serde_json::Value;

use crate::{
    db::{
        DbPool,
        query::{self, SqlQuery},
        record::Record,
    },
    error::AppError,
    extract::{JsonBody, PathParam},
    models::pet::{AdoptRequest, AdoptionResponse, BreedImageResponse},
    services::{adoption_service, breed_image},
    state::AppState,
};

/// Marketing blurb shown next to a pet type name.
pub fn describe_pet_type(name: &str) -> &'static str {
    match name.to_lowercase().as_str() {
        "dog" => "Loyal companions ready to join your family",
        "cat" => "Independent and loving feline friends",
        "fish" => "Peaceful aquatic pets for your home",
        "bird" => "Colorful and cheerful avian companions",
        _ => "Find your perfect companion",
    }
}

/// List every pet type.
///
/// # Response (200 OK)
///
/// ```json
/// [
///   { "id": 2, "name": "Cat", "description": "Independent and loving feline friends" },
///   { "id": 1, "name": "Dog", "description": "Loyal companions ready to join your family" }
/// ]
/// ```
pub async fn list_pet_types(State(pool): State<DbPool>) -> Result<Json<Vec<Record>>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT pet_type_id AS id, pet_type_name AS name
        FROM pet_type
        ORDER BY pet_type_name
        "#,
    );

    let mut pet_types = query::fetch_records(&pool, &query).await?;
    for pet_type in &mut pet_types {
        let description = pet_type
            .get("name")
            .and_then(Value::as_str)
            .map_or("Find your perfect companion", describe_pet_type);
        pet_type.insert("description".to_string(), description.into());
    }

    Ok(Json(pet_types))
}

/// List the breeds of one pet type. An unknown type yields an empty list.
pub async fn list_breeds_for_type(
    State(pool): State<DbPool>,
    PathParam(pet_type_id): PathParam<i32>,
) -> Result<Json<Vec<Record>>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT b.breed_id AS id, b.breed_name AS name, b.average_lifespan AS averagelifespan,
               pt.pet_type_id AS pet_type_id, pt.pet_type_name AS pet_type_name,
               b.image_url AS imageurl
        FROM breed b
        JOIN pet_type pt ON b.pet_type_id = pt.pet_type_id
        WHERE b.pet_type_id = $1
        ORDER BY b.breed_name
        "#,
    )
    .bind(pet_type_id);

    Ok(Json(query::fetch_records(&pool, &query).await?))
}

/// Stores holding at least one animal of the breed.
fn breed_stores_query(breed_id: i32, id_alias: &str, name_alias: &str) -> SqlQuery {
    SqlQuery::new(format!(
        r#"
        SELECT s.store_id AS {id_alias}, s.name AS {name_alias}, s.address AS address,
               s.contact_number AS contactnumber, s.city AS city, s.state AS state,
               a.available AS available
        FROM availability a
        JOIN store s ON a.store_id = s.store_id
        WHERE a.breed_id = $1 AND a.available > 0
        ORDER BY s.name
        "#
    ))
    .bind(breed_id)
}

/// Get a breed with the stores where it can currently be adopted.
///
/// # Response
///
/// - **Success (200 OK)**: breed fields plus an `availability` array
/// - **Error (404)**: Breed not found
///
/// ```json
/// {
///   "id": 1,
///   "name": "Labrador",
///   "averagelifespan": 12,
///   "pet_type_id": 1,
///   "pet_type_name": "Dog",
///   "availability": [
///     { "storeid": 1, "store_name": "Happy Tails Downtown", "available": 3, ... }
///   ]
/// }
/// ```
pub async fn get_breed(
    State(pool): State<DbPool>,
    PathParam(breed_id): PathParam<i32>,
) -> Result<Json<Record>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT b.breed_id AS id, b.breed_name AS name, b.average_lifespan AS averagelifespan,
               pt.pet_type_id AS pet_type_id, pt.pet_type_name AS pet_type_name
        FROM breed b
        JOIN pet_type pt ON b.pet_type_id = pt.pet_type_id
        WHERE b.breed_id = $1
        "#,
    )
    .bind(breed_id);

    let mut breed = query::fetch_record(&pool, &query)
        .await?
        .ok_or(AppError::NotFound("Breed not found"))?;

    let availability =
        query::fetch_records(&pool, &breed_stores_query(breed_id, "storeid", "store_name"))
            .await?;
    breed.insert("availability".to_string(), availability.into());

    Ok(Json(breed))
}

/// Stores where the breed is available, ordered by store name.
pub async fn list_breed_stores(
    State(pool): State<DbPool>,
    PathParam(breed_id): PathParam<i32>,
) -> Result<Json<Vec<Record>>, AppError> {
    let stores = query::fetch_records(&pool, &breed_stores_query(breed_id, "id", "name")).await?;
    Ok(Json(stores))
}

/// Return the breed's image, looking one up and persisting it on first request.
///
/// Dogs and cats are looked up against public image APIs; any other type,
/// or a failed lookup, answers with the default image without storing it.
pub async fn get_breed_image(
    State(state): State<AppState>,
    PathParam(breed_id): PathParam<i32>,
) -> Result<Json<BreedImageResponse>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT b.breed_name, pt.pet_type_name, b.image_url
        FROM breed b
        JOIN pet_type pt ON b.pet_type_id = pt.pet_type_id
        WHERE b.breed_id = $1
        "#,
    )
    .bind(breed_id);

    let breed = query::fetch_record(&state.pool, &query)
        .await?
        .ok_or(AppError::NotFound("Breed not found"))?;

    let stored = text(&breed, "image_url");
    if !stored.is_empty() {
        return Ok(Json(BreedImageResponse {
            image_url: stored.to_string(),
        }));
    }

    let found = breed_image::lookup(
        &state.http,
        text(&breed, "pet_type_name"),
        text(&breed, "breed_name"),
    )
    .await;

    let image_url = match found {
        Some(url) => {
            let update = SqlQuery::new("UPDATE breed SET image_url = $1 WHERE breed_id = $2")
                .bind(url.as_str())
                .bind(breed_id);
            query::execute(&state.pool, &update).await?;
            tracing::info!(breed_id, "Stored image for breed");
            url
        }
        None => breed_image::DEFAULT_IMAGE.to_string(),
    };

    Ok(Json(BreedImageResponse { image_url }))
}

fn text<'a>(record: &'a Record, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or_default()
}

/// Total animals available per breed across all stores, most plentiful first.
/// Breeds with nothing available are omitted.
pub async fn list_available_pets(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<Record>>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT a.breed_id AS breedid, b.breed_name AS breedname, pt.pet_type_name AS pettypename,
               SUM(a.available) AS total_available
        FROM availability a
        JOIN breed b ON a.breed_id = b.breed_id
        JOIN pet_type pt ON b.pet_type_id = pt.pet_type_id
        GROUP BY a.breed_id, b.breed_name, pt.pet_type_name
        HAVING SUM(a.available) > 0
        ORDER BY total_available DESC, breedname
        "#,
    );

    Ok(Json(query::fetch_records(&pool, &query).await?))
}

/// Adopt one animal of a breed from a store.
///
/// # Request Body
///
/// ```json
/// { "username": "demo", "breed_id": 1, "store_id": 1 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "success": true, "pet_id": 7 }`
/// - **Error (400)**: Missing required fields, or the store has none left
/// - **Error (404)**: User not found
pub async fn adopt_pet(
    State(pool): State<DbPool>,
    JsonBody(request): JsonBody<AdoptRequest>,
) -> Result<Json<AdoptionResponse>, AppError> {
    let (Some(username), Some(breed_id), Some(store_id)) = (
        super::non_empty(request.username),
        request.breed_id,
        request.store_id,
    ) else {
        return Err(AppError::invalid("Missing required fields"));
    };

    let pet = adoption_service::adopt(&pool, &username, breed_id, store_id).await?;

    Ok(Json(AdoptionResponse {
        success: true,
        pet_id: pet.pet_id,
    }))
}
