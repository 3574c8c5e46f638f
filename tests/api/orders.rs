use serde_json::{Value, json};

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn status_update_rejects_unknown_values_before_touching_the_database() {
    let app = TestApp::spawn_without_database().await;

    let response = app
        .put_json("/api/orders/1/status", &json!({ "status": "Lost" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Invalid status value");

    let response = app.put_json("/api/orders/1/status", &json!({})).await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Status is required");
}

#[tokio::test]
async fn placing_an_order_requires_username_and_store() {
    let app = TestApp::spawn_without_database().await;

    let response = app
        .post_json("/api/orders/place", &json!({ "username": "demo" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Missing required fields");
}

#[tokio::test]
async fn non_numeric_order_id_gets_the_json_error_body() {
    let app = TestApp::spawn_without_database().await;

    let response = app.get("/api/orders/abc").await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "invalid_request");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Cannot parse `abc`")
    );
}

async fn place(app: &TestApp, username: &str, store_id: i32) -> reqwest::Response {
    app.post_json(
        "/api/orders/place",
        &json!({ "username": username, "store_id": store_id }),
    )
    .await
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn placing_an_order_converts_the_cart() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;
    let store_id = app.create_store().await;
    app.stock_product(store_id, 1, 10).await;
    app.stock_product(store_id, 3, 1).await;

    app.add_to_cart(&username, 1, 2).await;
    // More than the store holds: the line is ordered, stock stays put
    app.add_to_cart(&username, 3, 4).await;

    let response = place(&app, &username, store_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let placed: Value = response.json().await.unwrap();
    let order_id = placed["order_id"].as_i64().unwrap() as i32;

    let status: String = sqlx::query_scalar("SELECT status FROM orders WHERE order_id = $1")
        .bind(order_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(status, "Pending");

    let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_details WHERE order_id = $1")
        .bind(order_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(lines, 2);

    assert_eq!(app.supplies(store_id, 1).await, 8);
    assert_eq!(app.supplies(store_id, 3).await, 1);

    let cart: Value = app
        .get(&format!("/api/products/cart?username={username}"))
        .await
        .json()
        .await
        .unwrap();
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn placing_an_empty_cart_is_rejected() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;

    let response = place(&app, &username, 1).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Cart is empty");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn order_detail_and_history_report_totals() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;
    let store_id = app.create_store().await;

    app.add_to_cart(&username, 4, 1).await; // 19.99
    app.add_to_cart(&username, 1, 1).await; // 39.99
    let placed: Value = place(&app, &username, store_id).await.json().await.unwrap();
    let order_id = placed["order_id"].as_i64().unwrap();

    let order: Value = app
        .get(&format!("/api/orders/{order_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(order["username"], username.as_str());
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["total_items"], 2);
    assert_eq!(order["subtotal"], 59.98);
    assert_eq!(order["tax"], 4.8);
    assert_eq!(order["total"], 64.78);

    let history: Vec<Value> = app
        .get(&format!("/api/orders/history/{username}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["orderid"], order_id);
    assert_eq!(history[0]["item_count"], 2);
    assert_eq!(history[0]["total_amount"], 59.98);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn invalid_status_leaves_the_stored_status_unchanged() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;
    app.add_to_cart(&username, 3, 1).await;
    let placed: Value = place(&app, &username, 1).await.json().await.unwrap();
    let order_id = placed["order_id"].as_i64().unwrap();
    let path = format!("/api/orders/{order_id}/status");

    let response = app.put_json(&path, &json!({ "status": "Teleported" })).await;
    assert_eq!(response.status().as_u16(), 400);

    let order: Value = app.get(&format!("/api/orders/{order_id}")).await.json().await.unwrap();
    assert_eq!(order["status"], "Pending");

    let response = app.put_json(&path, &json!({ "status": "Shipped" })).await;
    assert_eq!(response.status().as_u16(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["status"], "Shipped");

    let order: Value = app.get(&format!("/api/orders/{order_id}")).await.json().await.unwrap();
    assert_eq!(order["status"], "Shipped");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn status_update_on_missing_order_returns_404() {
    let app = TestApp::spawn_app().await;

    let response = app
        .put_json("/api/orders/999999/status", &json!({ "status": "Shipped" }))
        .await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_message(response).await, "Order not found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn lines_added_while_an_order_is_placed_stay_in_the_cart() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;
    let store_id = app.create_store().await;
    app.stock_product(store_id, 1, 10).await;
    app.add_to_cart(&username, 1, 1).await;

    // Hold the stock row so placement stops after it has locked the cart
    let mut blocker = app.pool.begin().await.unwrap();
    sqlx::query("SELECT quantity FROM supplies WHERE store_id = $1 FOR UPDATE")
        .bind(store_id)
        .fetch_all(&mut *blocker)
        .await
        .unwrap();

    let client = app.api_client.clone();
    let url = app.url("/api/orders/place");
    let body = json!({ "username": username, "store_id": store_id });
    let in_flight = tokio::spawn(async move {
        client.post(url).json(&body).send().await
    });

    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    app.add_to_cart(&username, 7, 1).await;
    blocker.commit().await.unwrap();

    let response = in_flight.await.unwrap().unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let placed: Value = response.json().await.unwrap();
    let order_id = placed["order_id"].as_i64().unwrap() as i32;

    let ordered: Vec<i32> = sqlx::query_scalar(
        "SELECT product_id FROM order_details WHERE order_id = $1 ORDER BY product_id",
    )
    .bind(order_id)
    .fetch_all(&app.pool)
    .await
    .unwrap();
    assert_eq!(ordered, vec![1]);

    let left: Vec<i32> = sqlx::query_scalar("SELECT product_id FROM cart WHERE username = $1")
        .bind(&username)
        .fetch_all(&app.pool)
        .await
        .unwrap();
    assert_eq!(left, vec![7]);
}
