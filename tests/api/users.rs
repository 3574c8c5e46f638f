use serde_json::{Value, json};
use uuid::Uuid;

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn login_without_credentials_is_rejected() {
    let app = TestApp::spawn_without_database().await;

    let response = app
        .post_json("/api/users/login", &json!({ "username": "demo" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Missing credentials");
}

#[tokio::test]
async fn register_without_required_fields_is_rejected() {
    let app = TestApp::spawn_without_database().await;

    let response = app
        .post_json(
            "/api/users/register",
            &json!({ "username": "someone", "password": "pw" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Missing required fields");
}

#[tokio::test]
async fn profile_update_requires_contact_fields() {
    let app = TestApp::spawn_without_database().await;

    let response = app
        .put_json(
            "/api/users/profile/demo",
            &json!({ "name": "Demo", "email": "demo@example.com", "phone": "555-0100" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Required fields missing");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn registering_the_same_username_twice_fails() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;

    let body = json!({
        "username": username,
        "password": "another",
        "email": format!("other-{}@example.com", Uuid::new_v4()),
    });
    let response = app.post_json("/api/users/register", &body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Username already exists");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn passwords_are_stored_hashed_and_verified() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;

    let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(stored.starts_with("$argon2id$"));

    let response = app
        .post_json(
            "/api/users/login",
            &json!({ "username": username, "password": "testpassword" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["username"], username.as_str());

    let response = app
        .post_json(
            "/api/users/login",
            &json!({ "username": username, "password": "wrong" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn seeded_user_can_log_in() {
    let app = TestApp::spawn_app().await;

    let response = app
        .post_json(
            "/api/users/login",
            &json!({ "username": "demo", "password": "demo123" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn profile_update_reads_back() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;
    let phone = format!("555-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let path = format!("/api/users/profile/{username}");

    let update = json!({
        "name": "Test Person",
        "email": format!("{username}@example.org"),
        "phone": phone,
        "address": "9 Test Rd",
        "city": "Springfield",
        "state": "IL",
    });
    let response = app.put_json(&path, &update).await;
    assert_eq!(response.status().as_u16(), 200);

    let profile: Value = app.get(&path).await.json().await.unwrap();
    assert_eq!(profile["name"], "Test Person");
    assert_eq!(profile["email"], update["email"]);
    assert_eq!(profile["phone"], update["phone"]);
    assert_eq!(profile["address"], "9 Test Rd");
    assert!(profile.get("password").is_none());
    assert!(profile["orders"].as_array().unwrap().is_empty());
    assert!(profile["pets"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn profile_update_rejects_another_users_email() {
    let app = TestApp::spawn_app().await;
    let username = app.create_user().await;

    let update = json!({
        "name": "Copycat",
        "email": "demo@happytails.example",
        "phone": format!("555-{}", &Uuid::new_v4().simple().to_string()[..8]),
        "city": "Springfield",
    });
    let response = app
        .put_json(&format!("/api/users/profile/{username}"), &update)
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        error_message(response).await,
        "Email or phone already in use by another user"
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn unknown_profile_returns_404() {
    let app = TestApp::spawn_app().await;

    let response = app.get("/api/users/profile/nobody-here").await;
    assert_eq!(response.status().as_u16(), 404);

    let update = json!({
        "name": "Ghost",
        "email": format!("{}@example.org", Uuid::new_v4()),
        "phone": format!("555-{}", &Uuid::new_v4().simple().to_string()[..8]),
        "city": "Nowhere",
    });
    let response = app.put_json("/api/users/profile/nobody-here", &update).await;
    assert_eq!(response.status().as_u16(), 404);
}
