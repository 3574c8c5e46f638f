//! Happy Tails API - Main Application Entry Point
//!
//! REST API for a pet store: adoption, product catalog and cart, orders,
//! a vet directory and user accounts.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (pooled async queries)
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Apply the bundled schema if the database is empty
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

use happy_tails_api::{config::Config, db, routes, state::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let pool = db::create_pool(&config).await?;
    tracing::info!(
        "Database pool created ({}-{} connections)",
        config.db_min_connections,
        config.db_max_connections
    );

    if db::bootstrap_schema(&pool).await? {
        tracing::info!("Schema and seed data applied");
    }

    let state = AppState::new(pool)?;
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
