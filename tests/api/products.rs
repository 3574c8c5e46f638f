use serde_json::Value;

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn product_list_requires_both_filters() {
    let app = TestApp::spawn_without_database().await;

    for path in [
        "/api/products/list",
        "/api/products/list?category=1",
        "/api/products/list?pet_type=1",
        "/api/products/list?category=&pet_type=1",
    ] {
        let response = app.get(path).await;

        assert_eq!(response.status().as_u16(), 400, "path: {path}");
        assert_eq!(
            error_message(response).await,
            "Category ID and Pet Type ID are required"
        );
    }
}

#[tokio::test]
async fn product_list_filters_must_be_integers() {
    let app = TestApp::spawn_without_database().await;

    let response = app.get("/api/products/list?category=food&pet_type=1").await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        error_message(response).await,
        "Invalid category ID or pet type ID"
    );
}

#[tokio::test]
async fn search_rejects_malformed_prices() {
    let app = TestApp::spawn_without_database().await;

    let response = app
        .get("/api/shopping-categories/search?min_price=cheap")
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Invalid min_price");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn product_list_matches_both_category_and_pet_type() {
    let app = TestApp::spawn_app().await;

    let products: Vec<Value> = app
        .get("/api/products/list?category=1&pet_type=1")
        .await
        .json()
        .await
        .unwrap();

    assert!(!products.is_empty());
    for product in &products {
        assert_eq!(product["category_id"], 1);
        assert_eq!(product["pet_type_id"], 1);
        assert!(product["price"].is_f64());
        assert!(product["in_stock"].is_boolean());
    }

    let names: Vec<&str> = products.iter().map(|p| p["name"].as_str().unwrap()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn missing_product_returns_404() {
    let app = TestApp::spawn_app().await;

    let response = app.get("/api/products/999999").await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_message(response).await, "Product not found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn product_detail_lists_stocking_stores() {
    let app = TestApp::spawn_app().await;
    let store_id = app.create_store().await;
    app.stock_product(store_id, 3, 4).await;

    let product: Value = app.get("/api/products/3").await.json().await.unwrap();

    assert_eq!(product["id"], 3);
    let stores = product["availability"].as_array().unwrap();
    let ours = stores
        .iter()
        .find(|s| s["storeid"] == store_id)
        .expect("new store is listed");
    assert_eq!(ours["quantity"], 4);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn category_stats_and_missing_category() {
    let app = TestApp::spawn_app().await;

    let stats: Value = app
        .get("/api/shopping-categories/1/stats")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(stats["category"], "Food");
    assert!(stats["total_products"].as_i64().unwrap() > 0);
    assert!(stats["min_price"].as_f64().unwrap() <= stats["max_price"].as_f64().unwrap());

    let response = app.get("/api/shopping-categories/999999/stats").await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.get("/api/shopping-categories/999999/products").await;
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(
        error_message(response).await,
        "No products found in this category"
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn search_combines_filters() {
    let app = TestApp::spawn_app().await;

    let products: Vec<Value> = app
        .get("/api/shopping-categories/search?pet_type_id=1&max_price=20&search=ROPE")
        .await
        .json()
        .await
        .unwrap();

    assert!(!products.is_empty());
    for product in &products {
        assert_eq!(product["pet_type"], "Dog");
        assert!(product["price"].as_f64().unwrap() <= 20.0);
        assert!(product["name"].as_str().unwrap().to_lowercase().contains("rope"));
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn categories_are_listed_by_name() {
    let app = TestApp::spawn_app().await;

    for path in ["/api/products/categories", "/api/shopping-categories/list"] {
        let categories: Vec<Value> = app.get(path).await.json().await.unwrap();
        let names: Vec<&str> = categories
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();

        assert_eq!(names, ["Accessories", "Food", "Health", "Toys"], "path: {path}");
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn category_products_and_empty_category() {
    let app = TestApp::spawn_app().await;

    let toys: Vec<Value> = app
        .get("/api/shopping-categories/2/products")
        .await
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = toys.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Bird Swing", "Chew Rope Toy", "Feather Wand"]);
    assert!(toys.iter().all(|p| p["category"] == "Toys"));

    let response = app.get("/api/shopping-categories/999999/products").await;
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(
        error_message(response).await,
        "No products found in this category"
    );
}
