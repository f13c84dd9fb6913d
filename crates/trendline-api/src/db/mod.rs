//! # Database Persistence Layer
//!
//! Postgres-backed key-value storage via SQLx.
//!
//! The database is **optional**. When `DATABASE_URL` is set, project records
//! are kept in the `kv_entries` table. When absent, the API runs on an
//! in-memory map (suitable for development and testing) and records do not
//! survive restarts.

pub mod kv;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if no URL is configured (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool(database_url: Option<&str>) -> Result<Option<PgPool>, sqlx::Error> {
    let url = match database_url {
        Some(url) => url,
        None => {
            tracing::warn!(
                "DATABASE_URL not set: running in-memory only mode. \
                 Projects will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
