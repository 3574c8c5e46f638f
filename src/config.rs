//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.
//! Every variable has a fallback default so the service starts against a local PostgreSQL with no setup.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DB_HOST` (optional): PostgreSQL host, defaults to `localhost`
/// - `DB_NAME` (optional): database name, defaults to `happy_tails`
/// - `DB_USER` (optional): database user, defaults to `postgres`
/// - `DB_PASSWORD` (optional): database password, defaults to `postgres`
/// - `DB_PORT` (optional): PostgreSQL port, defaults to 5432
/// - `PORT` (optional): HTTP server port, defaults to 5000
/// - `DB_MIN_CONNECTIONS` / `DB_MAX_CONNECTIONS` (optional): pool bounds, default 1 and 20
/// - `DB_ACQUIRE_TIMEOUT_SECS` (optional): how long a request waits for a free connection, default 30
#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_host")]
    pub db_host: String,

    #[serde(default = "default_db_name")]
    pub db_name: String,

    #[serde(default = "default_db_user")]
    pub db_user: String,

    #[serde(default = "default_db_password")]
    pub db_password: String,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_min_connections")]
    pub db_min_connections: u32,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_name() -> String {
    "happy_tails".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_db_port() -> u16 {
    5432
}

/// Default port if PORT environment variable is not set.
fn default_port() -> u16 {
    5000
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    20
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// its expected type (e.g. `DB_PORT=abc`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: db_host -> DB_HOST
        envy::from_env::<Config>()
    }

    /// Connection options for the PostgreSQL server described by this configuration.
    ///
    /// Built from discrete parts instead of a URL so passwords never need escaping.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_port", &self.db_port)
            .field("port", &self.port)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
