//! Product catalog HTTP handlers.
//!
//! - GET /api/products/categories
//! - GET /api/products/list?category=&pet_type=
//! - GET /api/products/{id}
//!
//! Cart endpoints live in [`super::cart`].

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
    models::product::ProductListQuery,
};

/// List every shopping category by name.
pub async fn list_categories(State(pool): State<DbPool>) -> Result<Json<Vec<Record>>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT category_id AS id, category_name AS name
        FROM shopping_category
        ORDER BY category_name
        "#,
    );

    Ok(Json(query::fetch_records(&pool, &query).await?))
}

/// List products matching both a category and a pet type.
///
/// # Query Parameters
///
/// - `category` - category id (required)
/// - `pet_type` - pet type id (required)
///
/// # Response
///
/// - **Success (200 OK)**: products ordered by name, each with `in_stock`
///   set when any store has a positive quantity
/// - **Error (400)**: a parameter is missing or not an integer
///
/// ```json
/// [
///   {
///     "product_id": 3,
///     "name": "Chew Toy",
///     "price": 9.99,
///     "category_id": 2,
///     "category_name": "Toys",
///     "pet_type_id": 1,
///     "pet_type_name": "Dog",
///     "in_stock": true
///   }
/// ]
/// ```
pub async fn list_products(
    State(pool): State<DbPool>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Vec<Record>>, AppError> {
    let (Some(category), Some(pet_type)) = (
        super::non_empty(params.category),
        super::non_empty(params.pet_type),
    ) else {
        return Err(AppError::invalid("Category ID and Pet Type ID are required"));
    };

    let (Ok(category_id), Ok(pet_type_id)) =
        (category.trim().parse::<i32>(), pet_type.trim().parse::<i32>())
    else {
        return Err(AppError::invalid("Invalid category ID or pet type ID"));
    };

    let query = SqlQuery::new(
        r#"
        SELECT p.product_id AS product_id, p.name AS name, p.price::float8 AS price,
               sc.category_id AS category_id, sc.category_name AS category_name,
               pt.pet_type_id AS pet_type_id, pt.pet_type_name AS pet_type_name,
               EXISTS (
                   SELECT 1 FROM supplies s
                   WHERE s.product_id = p.product_id AND s.quantity > 0
               ) AS in_stock
        FROM product p
        JOIN shopping_category sc ON p.category_id = sc.category_id
        JOIN pet_type pt ON p.pet_type_id = pt.pet_type_id
        WHERE p.category_id = $1 AND p.pet_type_id = $2
        ORDER BY p.name
        "#,
    )
    .bind(category_id)
    .bind(pet_type_id);

    Ok(Json(query::fetch_records(&pool, &query).await?))
}

/// Get one product with the stores that stock it.
///
/// # Response
///
/// - **Success (200 OK)**: product fields plus an `availability` array of
///   stores with a positive quantity
/// - **Error (404)**: Product not found
pub async fn get_product(
    State(pool): State<DbPool>,
    PathParam(product_id): PathParam<i32>,
) -> Result<Json<Record>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT p.product_id AS id, p.name AS name, p.price::float8 AS price,
               sc.category_id AS categoryid, sc.category_name AS category,
               pt.pet_type_id AS pettypeid, pt.pet_type_name AS pet_type
        FROM product p
        JOIN shopping_category sc ON p.category_id = sc.category_id
        JOIN pet_type pt ON p.pet_type_id = pt.pet_type_id
        WHERE p.product_id = $1
        "#,
    )
    .bind(product_id);

    let mut product = query::fetch_record(&pool, &query)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    let stock = SqlQuery::new(
        r#"
        SELECT s.store_id AS storeid, s.name AS store_name, s.address AS address,
               s.contact_number AS contactnumber, s.city AS city, s.state AS state,
               su.quantity AS quantity
        FROM supplies su
        JOIN store s ON su.store_id = s.store_id
        WHERE su.product_id = $1 AND su.quantity > 0
        ORDER BY s.name
        "#,
    )
    .bind(product_id);

    let availability = query::fetch_records(&pool, &stock).await?;
    product.insert("availability".to_string(), availability.into());

    Ok(Json(product))
}
