//! Shared application state handed to every handler.

use std::time::Duration;

use axum::extract::FromRef;

use crate::db::DbPool;

/// Resources created once at startup and cloned into each request.
///
/// Both fields are cheap handles: cloning shares the same pool and HTTP client.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,

    /// Client for third-party breed image lookups
    pub http: reqwest::Client,
}

impl AppState {
    /// Build state around an existing pool.
    ///
    /// Outbound lookups time out after 5 seconds so a slow image API
    /// never holds a request open indefinitely.
    pub fn new(pool: DbPool) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { pool, http })
    }
}

/// Lets handlers that only need the database extract `State<DbPool>` directly.
impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
