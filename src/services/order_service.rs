//! Order service - converts a user's cart into an order.
//!
//! This service handles:
//! - Locking the cart so the same cart cannot be placed twice concurrently
//! - Creating the order header and one line per cart item
//! - Guarded stock decrements that never drive `supplies.quantity` negative
//! - Removing the ordered lines from the cart
//!
//! # Atomicity Guarantees
//!
//! Every step runs in one PostgreSQL transaction; a failure at any point
//! leaves the cart, stock and orders untouched.

use crate::{
    db::{
        DbPool,
        query::{self, SqlQuery},
    },
    error::AppError,
    models::order::{CartLine, OrderStatus},
};

/// Place an order for everything in `username`'s cart, fulfilled by `store_id`.
///
/// # Stock Handling
///
/// Each line decrements the store's stock only when enough is on hand
/// (`quantity >= ordered`). Lines the store cannot cover, or products the
/// store does not carry, leave stock unchanged; the order line is still
/// recorded and the shortfall is logged.
///
/// # Errors
///
/// - `InvalidRequest`: the cart is empty
/// - `NotFound`: the store does not exist
/// - `Database`: database error, transaction rolled back
pub async fn place_order(pool: &DbPool, username: &str, store_id: i32) -> Result<i32, AppError> {
    let mut tx = pool.begin().await?;

    // FOR UPDATE serializes concurrent placements of the same cart
    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT cart_id, product_id, quantity
        FROM cart
        WHERE username = $1
        ORDER BY cart_id
        FOR UPDATE
        "#,
    )
    .bind(username)
    .fetch_all(&mut *tx)
    .await?;

    if lines.is_empty() {
        tx.rollback().await?;
        return Err(AppError::invalid("Cart is empty"));
    }

    let store_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM store WHERE store_id = $1)")
            .bind(store_id)
            .fetch_one(&mut *tx)
            .await?;

    if !store_exists {
        tx.rollback().await?;
        return Err(AppError::NotFound("Store not found"));
    }

    let order_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO orders (username, store_id, status)
        VALUES ($1, $2, $3)
        RETURNING order_id
        "#,
    )
    .bind(username)
    .bind(store_id)
    .bind(OrderStatus::Pending.as_str())
    .fetch_one(&mut *tx)
    .await?;

    for line in &lines {
        sqlx::query(
            "INSERT INTO order_details (order_id, product_id, quantity) VALUES ($1, $2, $3)",
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?;

        // Guard and decrement in one statement; the row lock is held until commit
        let decremented = sqlx::query(
            r#"
            UPDATE supplies
            SET quantity = quantity - $1
            WHERE store_id = $2 AND product_id = $3 AND quantity >= $1
            "#,
        )
        .bind(line.quantity)
        .bind(store_id)
        .bind(line.product_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if decremented == 0 {
            tracing::warn!(
                order_id,
                store_id,
                product_id = line.product_id,
                requested = line.quantity,
                "Insufficient stock, supplies left unchanged"
            );
        }
    }

    // Only the locked lines; anything added meanwhile stays in the cart
    let ordered: Vec<i32> = lines.iter().map(|line| line.cart_id).collect();
    sqlx::query("DELETE FROM cart WHERE cart_id = ANY($1)")
        .bind(&ordered)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(order_id, lines = lines.len(), "Order placed by {}", username);

    Ok(order_id)
}

/// Set the status of an existing order.
///
/// # Errors
///
/// - `NotFound`: no order with this id
pub async fn update_status(
    pool: &DbPool,
    order_id: i32,
    status: OrderStatus,
) -> Result<(), AppError> {
    let update = SqlQuery::new("UPDATE orders SET status = $1 WHERE order_id = $2")
        .bind(status.as_str())
        .bind(order_id);

    if query::execute(pool, &update).await? == 0 {
        return Err(AppError::NotFound("Order not found"));
    }

    Ok(())
}
