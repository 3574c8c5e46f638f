//! Database connection pool and schema bootstrap.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Applying the bundled schema/seed script on first boot
//! - Executing hand-written SQL through the [`query`] helper

pub mod query;
pub mod record;

use sqlx::{Pool, Postgres, postgres::PgPoolOptions};

use crate::config::Config;

/// Type alias for PostgreSQL connection pool.
///
/// Instead of writing `Pool<Postgres>` everywhere, we can use `DbPool`.
pub type DbPool = Pool<Postgres>;

/// Table whose presence means the schema script has already been applied.
pub const MARKER_TABLE: &str = "users";

/// Schema and seed data applied verbatim when [`MARKER_TABLE`] is missing.
const SCHEMA_SCRIPT: &str = include_str!("../../data/schema.sql");

/// Create a new PostgreSQL connection pool.
///
/// The pool is created once in `main` and shared with every handler through
/// application state. Connections are reused across HTTP requests and returned
/// to the pool when the query or transaction holding them is dropped, including
/// after an error.
///
/// # Configuration
///
/// - Minimum connections: `DB_MIN_CONNECTIONS` (default 1)
/// - Maximum connections: `DB_MAX_CONNECTIONS` (default 20)
/// - When all connections are busy, callers wait up to `DB_ACQUIRE_TIMEOUT_SECS`
///   and then fail with `sqlx::Error::PoolTimedOut`
///
/// # Errors
///
/// Returns an error if:
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    pool_options(config)
        .connect_with(config.connect_options())
        .await
}

/// Same pool settings as [`create_pool`], but no connection is opened until first use.
pub fn create_lazy_pool(config: &Config) -> DbPool {
    pool_options(config).connect_lazy_with(config.connect_options())
}

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .min_connections(config.db_min_connections)
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.acquire_timeout())
}

/// Apply the bundled schema script unless the marker table already exists.
///
/// This is a one-shot bootstrap, not a versioned migration system: once the
/// marker table is present nothing is executed, even if the script changed.
/// The script runs in a single transaction so a failure leaves no partial schema.
///
/// Returns `true` when the script was applied.
pub async fn bootstrap_schema(pool: &DbPool) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = $1
        )
        "#,
    )
    .bind(MARKER_TABLE)
    .fetch_one(pool)
    .await?;

    if exists {
        tracing::info!("Schema already present, skipping bootstrap");
        return Ok(false);
    }

    tracing::info!("Marker table {} missing, applying schema script", MARKER_TABLE);

    let mut tx = pool.begin().await?;
    sqlx::raw_sql(SCHEMA_SCRIPT).execute(&mut *tx).await?;
    tx.commit().await?;

    Ok(true)
}
