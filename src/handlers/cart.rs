//! Shopping cart HTTP handlers.
//!
//! - GET /api/products/cart?username=
//! - POST /api/products/cart/add
//! - POST /api/products/cart/remove
//! - POST /api/products/cart/update
//!
//! A user holds at most one cart line per product; adding a product that is
//! already in the cart increases that line's quantity.

use axum::{
    Json,
    extract::{Query, State},
};
use sqlx::error::DatabaseError;

use crate::{
    db::{
        DbPool,
        query::{self, SqlQuery},
    },
    error::AppError,
    extract::JsonBody,
    models::{
        order::{round_cents, sum_field},
        product::{
            AddToCartRequest, CartQuery, CartView, RemoveFromCartRequest, SuccessResponse,
            UpdateCartRequest,
        },
    },
};

/// Show a user's cart with per-line and overall totals.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "items": [
///     { "cartid": 4, "productid": 3, "product_name": "Chew Toy",
///       "price": 9.99, "quantity": 2, "total_price": 19.98 }
///   ],
///   "total": 19.98
/// }
/// ```
///
/// An unknown user simply has an empty cart.
pub async fn view_cart(
    State(pool): State<DbPool>,
    Query(params): Query<CartQuery>,
) -> Result<Json<CartView>, AppError> {
    let username =
        super::non_empty(params.username).ok_or_else(|| AppError::invalid("Username is required"))?;

    let query = SqlQuery::new(
        r#"
        SELECT c.cart_id AS cartid, c.product_id AS productid, p.name AS product_name,
               p.price::float8 AS price, c.quantity AS quantity,
               (p.price * c.quantity)::float8 AS total_price
        FROM cart c
        JOIN product p ON c.product_id = p.product_id
        WHERE c.username = $1
        ORDER BY c.cart_id
        "#,
    )
    .bind(username);

    let items = query::fetch_records(&pool, &query).await?;
    let total = round_cents(sum_field(&items, "total_price"));

    Ok(Json(CartView { items, total }))
}

/// Add a product to a cart, merging with an existing line for the same product.
///
/// # Request Body
///
/// ```json
/// { "username": "demo", "product_id": 3, "quantity": 2 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "success": true }`
/// - **Error (400)**: Missing required fields, or a non-positive quantity
/// - **Error (404)**: the user or product does not exist
pub async fn add_to_cart(
    State(pool): State<DbPool>,
    JsonBody(request): JsonBody<AddToCartRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let (Some(username), Some(product_id)) =
        (super::non_empty(request.username), request.product_id)
    else {
        return Err(AppError::invalid("Missing required fields"));
    };

    let quantity = request.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::invalid("Quantity must be positive"));
    }

    // Single statement so concurrent adds of the same product cannot create two lines
    let upsert = SqlQuery::new(
        r#"
        INSERT INTO cart (username, product_id, quantity)
        VALUES ($1, $2, $3)
        ON CONFLICT (username, product_id)
        DO UPDATE SET quantity = cart.quantity + EXCLUDED.quantity
        RETURNING cart_id, quantity
        "#,
    )
    .bind(username.as_str())
    .bind(product_id)
    .bind(quantity);

    match query::execute_returning(&pool, &upsert).await {
        Ok(line) => {
            tracing::debug!(username = %username, product_id, ?line, "Cart line saved");
            Ok(Json(SuccessResponse::ok()))
        }
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            Err(AppError::NotFound("User or product not found"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove a cart line. Removing a line that does not exist still succeeds.
pub async fn remove_from_cart(
    State(pool): State<DbPool>,
    JsonBody(request): JsonBody<RemoveFromCartRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let cart_id = request
        .cart_id
        .ok_or_else(|| AppError::invalid("Cart ID is required"))?;

    let delete = SqlQuery::new("DELETE FROM cart WHERE cart_id = $1").bind(cart_id);
    query::execute(&pool, &delete).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Set a cart line's quantity; zero or less removes the line.
pub async fn update_cart(
    State(pool): State<DbPool>,
    JsonBody(request): JsonBody<UpdateCartRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let (Some(cart_id), Some(quantity)) = (request.cart_id, request.quantity) else {
        return Err(AppError::invalid("Missing required fields"));
    };

    let statement = if quantity <= 0 {
        SqlQuery::new("DELETE FROM cart WHERE cart_id = $1").bind(cart_id)
    } else {
        SqlQuery::new("UPDATE cart SET quantity = $1 WHERE cart_id = $2")
            .bind(quantity)
            .bind(cart_id)
    };
    query::execute(&pool, &statement).await?;

    Ok(Json(SuccessResponse::ok()))
}
