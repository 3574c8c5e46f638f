//! Shopping category HTTP handlers.
//!
//! - GET /api/shopping-categories/list
//! - GET /api/shopping-categories/{id}/products
//! - GET /api/shopping-categories/{id}/stats
//! - GET /api/shopping-categories/search

use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    db::{
        DbPool,
        query::{self, SqlQuery},
        record::Record,
    },
    error::AppError,
    extract::PathParam,
    models::product::ProductSearchQuery,
};

const PRODUCT_SUMMARY: &str = r#"
    SELECT p.product_id AS id, p.name AS name, p.price::float8 AS price,
           sc.category_name AS category, pt.pet_type_name AS pet_type
    FROM product p
    JOIN shopping_category sc ON p.category_id = sc.category_id
    JOIN pet_type pt ON p.pet_type_id = pt.pet_type_id
"#;

pub async fn list_categories(State(pool): State<DbPool>) -> Result<Json<Vec<Record>>, AppError> {
    super::products::list_categories(State(pool)).await
}

/// Products in one category, ordered by name.
///
/// # Response
///
/// - **Success (200 OK)**: array of `{id, name, price, category, pet_type}`
/// - **Error (404)**: No products found in this category
pub async fn category_products(
    State(pool): State<DbPool>,
    PathParam(category_id): PathParam<i32>,
) -> Result<Json<Vec<Record>>, AppError> {
    let mut query = SqlQuery::new(PRODUCT_SUMMARY);
    query
        .filter("p.category_id = ?", category_id)
        .order_by("p.name");

    let products = query::fetch_records(&pool, &query).await?;
    if products.is_empty() {
        return Err(AppError::NotFound("No products found in this category"));
    }

    Ok(Json(products))
}

/// Price statistics for a category.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "category": "Food",
///   "total_products": 3,
///   "average_price": 24.32,
///   "min_price": 12.99,
///   "max_price": 39.99,
///   "pet_type_count": 3
/// }
/// ```
///
/// A category without products reports zero counts and null prices.
pub async fn category_stats(
    State(pool): State<DbPool>,
    PathParam(category_id): PathParam<i32>,
) -> Result<Json<Record>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT sc.category_name AS category,
               COUNT(p.product_id) AS total_products,
               AVG(p.price)::float8 AS average_price,
               MIN(p.price)::float8 AS min_price,
               MAX(p.price)::float8 AS max_price,
               COUNT(DISTINCT p.pet_type_id) AS pet_type_count
        FROM shopping_category sc
        LEFT JOIN product p ON sc.category_id = p.category_id
        WHERE sc.category_id = $1
        GROUP BY sc.category_name
        "#,
    )
    .bind(category_id);

    let stats = query::fetch_record(&pool, &query)
        .await?
        .ok_or(AppError::NotFound("Category not found"))?;

    Ok(Json(stats))
}

/// Parse an optional numeric filter, rejecting values that are present but malformed.
fn parse_filter<T: FromStr>(value: Option<String>, name: &str) -> Result<Option<T>, AppError> {
    super::non_empty(value)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| AppError::invalid(format!("Invalid {name}")))
        })
        .transpose()
}

/// Build the product search from whichever filters were supplied.
fn search_query(params: ProductSearchQuery) -> Result<SqlQuery, AppError> {
    let category_id = parse_filter::<i32>(params.category_id, "category_id")?;
    let pet_type_id = parse_filter::<i32>(params.pet_type_id, "pet_type_id")?;
    let min_price = parse_filter::<f64>(params.min_price, "min_price")?;
    let max_price = parse_filter::<f64>(params.max_price, "max_price")?;
    let search = super::non_empty(params.search).map(|term| format!("%{}%", term.trim()));

    let mut query = SqlQuery::new(PRODUCT_SUMMARY);
    query
        .filter_opt("p.category_id = ?", category_id)
        .filter_opt("p.pet_type_id = ?", pet_type_id)
        .filter_opt("p.price >= ?::numeric", min_price)
        .filter_opt("p.price <= ?::numeric", max_price)
        .filter_opt("p.name ILIKE ?", search)
        .order_by("p.name");

    Ok(query)
}

/// Search products with any combination of filters.
///
/// # Query Parameters
///
/// All optional: `category_id`, `pet_type_id`, `min_price`, `max_price`,
/// and `search` (case-insensitive substring of the product name).
///
/// # Response
///
/// - **Success (200 OK)**: matching products ordered by name (may be empty)
/// - **Error (400)**: a numeric filter does not parse
pub async fn search_products(
    State(pool): State<DbPool>,
    Query(params): Query<ProductSearchQuery>,
) -> Result<Json<Vec<Record>>, AppError> {
    let query = search_query(params)?;
    Ok(Json(query::fetch_records(&pool, &query).await?))
}
