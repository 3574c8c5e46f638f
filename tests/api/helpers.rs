use std::sync::LazyLock;

use happy_tails_api::{
    config::Config,
    db::{self, DbPool},
    routes,
    state::AppState,
};
use serde_json::Value;
use uuid::Uuid;

static LOGGER_INSTANCE: LazyLock<()> = LazyLock::new(|| {
    // TEST_LOG=1 shows server logs while debugging a failing test
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    }
});

pub struct TestApp {
    pub address: String,
    pub pool: DbPool,
    pub api_client: reqwest::Client,
}

impl TestApp {
    async fn serve(pool: DbPool) -> TestApp {
        LazyLock::force(&LOGGER_INSTANCE);

        let state = AppState::new(pool.clone()).expect("Failed to build application state");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, routes::router(state))
                .await
                .expect("Server error");
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            pool,
            api_client: reqwest::Client::new(),
        }
    }

    /// App whose pool never connects; only requests rejected before any query succeed.
    pub async fn spawn_without_database() -> TestApp {
        let mut config = Config::from_env().expect("Failed to read configuration");
        config.db_acquire_timeout_secs = 1;

        TestApp::serve(db::create_lazy_pool(&config)).await
    }

    /// App backed by the PostgreSQL configured through the `DB_*` variables.
    pub async fn spawn_app() -> TestApp {
        let config = Config::from_env().expect("Failed to read configuration");
        let pool = db::create_pool(&config)
            .await
            .expect("Failed to connect to postgres database");
        db::bootstrap_schema(&pool)
            .await
            .expect("Failed to apply schema");

        TestApp::serve(pool).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register a fresh user through the API and return its username.
    pub async fn create_user(&self) -> String {
        let username = format!("user-{}", Uuid::new_v4().simple());
        let body = serde_json::json!({
            "username": username,
            "password": "testpassword",
            "email": format!("{}@example.com", username),
        });

        let response = self.post_json("/api/users/register", &body).await;
        assert_eq!(response.status().as_u16(), 201);

        username
    }

    /// A new store, so stock assertions are not disturbed by other tests.
    pub async fn create_store(&self) -> i32 {
        sqlx::query_scalar(
            r#"
            INSERT INTO store (name, address, contact_number, city, state)
            VALUES ($1, '1 Test Way', '555-0000', 'Testville', 'TS')
            RETURNING store_id
            "#,
        )
        .bind(format!("Test Store {}", Uuid::new_v4()))
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create store")
    }

    pub async fn stock_breed(&self, store_id: i32, breed_id: i32, available: i32) {
        sqlx::query("INSERT INTO availability (breed_id, store_id, available) VALUES ($1, $2, $3)")
            .bind(breed_id)
            .bind(store_id)
            .bind(available)
            .execute(&self.pool)
            .await
            .expect("Failed to stock breed");
    }

    pub async fn stock_product(&self, store_id: i32, product_id: i32, quantity: i32) {
        sqlx::query("INSERT INTO supplies (store_id, product_id, quantity) VALUES ($1, $2, $3)")
            .bind(store_id)
            .bind(product_id)
            .bind(quantity)
            .execute(&self.pool)
            .await
            .expect("Failed to stock product");
    }

    pub async fn available(&self, store_id: i32, breed_id: i32) -> i32 {
        sqlx::query_scalar(
            "SELECT available FROM availability WHERE store_id = $1 AND breed_id = $2",
        )
        .bind(store_id)
        .bind(breed_id)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to read availability")
    }

    pub async fn supplies(&self, store_id: i32, product_id: i32) -> i32 {
        sqlx::query_scalar("SELECT quantity FROM supplies WHERE store_id = $1 AND product_id = $2")
            .bind(store_id)
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to read supplies")
    }

    pub async fn add_to_cart(&self, username: &str, product_id: i32, quantity: i32) {
        let body = serde_json::json!({
            "username": username,
            "product_id": product_id,
            "quantity": quantity,
        });

        let response = self.post_json("/api/products/cart/add", &body).await;
        assert_eq!(response.status().as_u16(), 200);
    }
}

/// Message from the standard error body.
pub async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("Error body is not JSON");
    body["error"]["message"]
        .as_str()
        .expect("Error body has no message")
        .to_string()
}
