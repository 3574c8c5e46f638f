//! Order HTTP handlers.
//!
//! This module implements the order-related API endpoints:
//! - POST /api/orders/place - Turn a cart into an order
//! - GET /api/orders/history/{username} - Order summaries, newest first
//! - GET /api/orders/{id} - Order detail with items and totals
//! - PUT /api/orders/{id}/status - Change an order's status

use axum::{Json, extract::State};

use crate::{
    db::{
        DbPool,
        query::{self, SqlQuery},
        record::Record,
    },
    error::AppError,
    extract::{JsonBody, PathParam},
    models::order::{
        OrderPlacedResponse, OrderStatus, OrderTotals, PlaceOrderRequest, StatusUpdatedResponse,
        UpdateStatusRequest,
    },
    services::order_service,
};

/// Place an order for everything in the user's cart.
///
/// # Request Body
///
/// ```json
/// { "username": "demo", "store_id": 1 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "success": true, "order_id": 12 }`
/// - **Error (400)**: Missing required fields, or Cart is empty
/// - **Error (404)**: Store not found
///
/// See [`order_service::place_order`] for how stock is handled.
pub async fn place_order(
    State(pool): State<DbPool>,
    JsonBody(request): JsonBody<PlaceOrderRequest>,
) -> Result<Json<OrderPlacedResponse>, AppError> {
    let (Some(username), Some(store_id)) = (super::non_empty(request.username), request.store_id)
    else {
        return Err(AppError::invalid("Missing required fields"));
    };

    let order_id = order_service::place_order(&pool, &username, store_id).await?;

    Ok(Json(OrderPlacedResponse {
        success: true,
        order_id,
    }))
}

/// Order summaries for a user, newest first.
///
/// Each entry carries the store, the number of distinct products
/// (`item_count`) and the order value (`total_amount`).
pub async fn order_history(
    State(pool): State<DbPool>,
    PathParam(username): PathParam<String>,
) -> Result<Json<Vec<Record>>, AppError> {
    let query = SqlQuery::new(
        r#"
        SELECT o.order_id AS orderid, o.order_date AS orderdate, o.status AS status,
               s.name AS store_name, s.city AS store_city, s.state AS store_state,
               COUNT(od.product_id) AS item_count,
               SUM(p.price * od.quantity)::float8 AS total_amount
        FROM orders o
        JOIN order_details od ON o.order_id = od.order_id
        JOIN product p ON od.product_id = p.product_id
        JOIN store s ON o.store_id = s.store_id
        WHERE o.username = $1
        GROUP BY o.order_id, o.order_date, o.status, s.name, s.city, s.state
        ORDER BY o.order_date DESC, o.order_id DESC
        "#,
    )
    .bind(username);

    Ok(Json(query::fetch_records(&pool, &query).await?))
}

/// Get an order with its line items and totals.
///
/// # Response
///
/// - **Success (200 OK)**
/// - **Error (404)**: Order not found
///
/// ```json
/// {
///   "orderid": 12,
///   "username": "demo",
///   "orderdate": "2026-01-21T19:00:00+00:00",
///   "status": "Pending",
///   "storeid": 1,
///   "store_name": "Happy Tails Downtown",
///   "items": [
///     { "productid": 3, "product_name": "Chew Toy", "quantity": 2, "price": 9.99, "total_price": 19.98 }
///   ],
///   "total_items": 2,
///   "subtotal": 19.98,
///   "tax": 1.6,
///   "total": 21.58
/// }
/// ```
///
/// Tax is 8% of the subtotal, rounded to cents.
pub async fn get_order(
    State(pool): State<DbPool>,
    PathParam(order_id): PathParam<i32>,
) -> Result<Json<Record>, AppError> {
    let header = SqlQuery::new(
        r#"
        SELECT o.order_id AS orderid, o.username AS username, o.order_date AS orderdate,
               o.status AS status, s.store_id AS storeid, s.name AS store_name,
               s.address AS store_address, s.city AS store_city, s.state AS store_state
        FROM orders o
        JOIN store s ON o.store_id = s.store_id
        WHERE o.order_id = $1
        "#,
    )
    .bind(order_id);

    let mut order = query::fetch_record(&pool, &header)
        .await?
        .ok_or(AppError::NotFound("Order not found"))?;

    let lines = SqlQuery::new(
        r#"
        SELECT od.product_id AS productid, p.name AS product_name, od.quantity AS quantity,
               p.price::float8 AS price, (p.price * od.quantity)::float8 AS total_price
        FROM order_details od
        JOIN product p ON od.product_id = p.product_id
        WHERE od.order_id = $1
        ORDER BY p.name
        "#,
    )
    .bind(order_id);

    let items = query::fetch_records(&pool, &lines).await?;
    let totals = OrderTotals::from_items(&items);

    order.insert("items".to_string(), items.into());
    order.insert("total_items".to_string(), totals.total_items.into());
    order.insert("subtotal".to_string(), totals.subtotal.into());
    order.insert("tax".to_string(), totals.tax.into());
    order.insert("total".to_string(), totals.total.into());

    Ok(Json(order))
}

/// Parse the requested status before anything touches the database.
fn requested_status(request: UpdateStatusRequest) -> Result<OrderStatus, AppError> {
    let status =
        super::non_empty(request.status).ok_or_else(|| AppError::invalid("Status is required"))?;

    status
        .parse()
        .map_err(|_| AppError::invalid("Invalid status value"))
}

/// Change an order's status.
///
/// # Request Body
///
/// ```json
/// { "status": "Shipped" }
/// ```
///
/// `status` must be exactly one of `Pending`, `Shipped`, `Delivered`,
/// `Cancelled`.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "success": true, "order_id": 12, "status": "Shipped" }`
/// - **Error (400)**: Status is required, or Invalid status value
/// - **Error (404)**: Order not found
pub async fn update_order_status(
    State(pool): State<DbPool>,
    PathParam(order_id): PathParam<i32>,
    JsonBody(request): JsonBody<UpdateStatusRequest>,
) -> Result<Json<StatusUpdatedResponse>, AppError> {
    let status = requested_status(request)?;

    order_service::update_status(&pool, order_id, status).await?;
    tracing::info!(order_id, status = %status, "Order status updated");

    Ok(Json(StatusUpdatedResponse {
        success: true,
        order_id,
        status,
    }))
}
