use anyhow::{Context, Result};
use moka::future::Cache;
use sea_orm::Database;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

pub const DEFAULT_TOKEN_CACHE_TTL_SECS: u64 = 300;

/// How long a resolved session token stays cached, from `TOKEN_CACHE_TTL_SECS`.
pub fn token_cache_ttl() -> Duration {
    let secs = std::env::var("TOKEN_CACHE_TTL_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_TOKEN_CACHE_TTL_SECS);
    Duration::from_secs(secs)
}

pub fn token_cache(ttl: Duration) -> Cache<String, i32> {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(ttl)
        .build()
}

/// Connect to the database and build the shared application state
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;

    let ttl = token_cache_ttl();
    debug!("Token cache TTL: {:?}", ttl);

    Ok(AppState {
        db,
        cache: token_cache(ttl),
    })
}
