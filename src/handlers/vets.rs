//! Veterinarian directory HTTP handlers.
//!
//! - GET /api/vets/list?city=&state=&rating=
//! - GET /api/vets/{id}
//! - GET /api/vets/cities
//! - GET /api/vets/states

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Value, json};

use crate::{
    db::{
        DbPool,
        query::{self, SqlQuery},
        record::Record,
    },
    error::AppError,
    extract::PathParam,
    models::vet::{VET_SERVICES, VetListQuery},
};

const VET_COLUMNS: &str = r#"
    SELECT vet_id AS id, name, contact_number AS contactnumber, address, city, state,
           rating, opening_time AS openingtime, closing_time AS closingtime
    FROM vet
"#;

fn vet_list_query(params: VetListQuery) -> Result<SqlQuery, AppError> {
    let rating = super::non_empty(params.rating)
        .map(|raw| raw.trim().parse::<f64>())
        .transpose()
        .map_err(|_| AppError::invalid("Invalid rating"))?;

    let mut query = SqlQuery::new(VET_COLUMNS);
    query
        .filter_opt(
            "city ILIKE ?",
            super::non_empty(params.city).map(|city| format!("%{}%", city.trim())),
        )
        .filter_opt("state = ?", super::non_empty(params.state))
        .filter_opt("rating >= ?", rating)
        .order_by("rating DESC, name");

    Ok(query)
}

/// List vets, best rated first.
///
/// # Query Parameters
///
/// - `city` - case-insensitive substring of the city
/// - `state` - exact state code
/// - `rating` - minimum rating (400 if not a number)
///
/// Opening and closing times are rendered as `HH:MM:SS`.
pub async fn list_vets(
    State(pool): State<DbPool>,
    Query(params): Query<VetListQuery>,
) -> Result<Json<Vec<Record>>, AppError> {
    let query = vet_list_query(params)?;
    Ok(Json(query::fetch_records(&pool, &query).await?))
}

/// Get one vet together with the services every clinic offers.
///
/// # Response
///
/// - **Success (200 OK)**: vet fields plus a `services` array
/// - **Error (404)**: Vet not found
pub async fn get_vet(
    State(pool): State<DbPool>,
    PathParam(vet_id): PathParam<i32>,
) -> Result<Json<Record>, AppError> {
    let mut query = SqlQuery::new(VET_COLUMNS);
    query.filter("vet_id = ?", vet_id);

    let mut vet = query::fetch_record(&pool, &query)
        .await?
        .ok_or(AppError::NotFound("Vet not found"))?;

    vet.insert("services".to_string(), json!(VET_SERVICES));

    Ok(Json(vet))
}

/// First column of every row, for single-column lookups.
async fn first_column(pool: &DbPool, sql: &str) -> Result<Vec<Value>, AppError> {
    let rows = query::fetch_rows(pool, &SqlQuery::new(sql)).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .collect())
}

/// Distinct cities that have at least one vet, alphabetically.
pub async fn list_cities(State(pool): State<DbPool>) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(
        first_column(&pool, "SELECT DISTINCT city FROM vet ORDER BY city").await?,
    ))
}

/// Distinct states that have at least one vet, alphabetically.
pub async fn list_states(State(pool): State<DbPool>) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(
        first_column(&pool, "SELECT DISTINCT state FROM vet ORDER BY state").await?,
    ))
}
