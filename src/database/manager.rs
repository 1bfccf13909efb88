use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::config::DatabaseConfig;
use super::store::StoreError;

/// Builds the single application pool from DATABASE_URL.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let raw = std::env::var("DATABASE_URL")
        .map_err(|_| StoreError::Connection("DATABASE_URL is not set".to_string()))?;

    // Validate the URL up front so misconfiguration fails at startup,
    // not on the first request.
    let parsed = url::Url::parse(&raw)
        .map_err(|_| StoreError::Connection("DATABASE_URL is not a valid URL".to_string()))?;
    if parsed.scheme() != "postgres" && parsed.scheme() != "postgresql" {
        return Err(StoreError::Connection(format!(
            "unsupported database scheme: {}",
            parsed.scheme()
        )));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .connect(&raw)
        .await?;

    tracing::info!("connected database pool to {}", parsed.host_str().unwrap_or("?"));
    Ok(pool)
}

/// Pings the pool to confirm connectivity. Used by /health.
pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
