//! Key-value operations on the `kv_entries` table.
//!
//! All functions take a `&PgPool`. Values are opaque strings here; the
//! project store owns encoding and decoding.

use sqlx::PgPool;

/// Fetch the value stored under `key`.
pub async fn get(pool: &PgPool, key: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_entries WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(value,)| value))
}

/// Store `value` under `key`, replacing any existing value.
pub async fn put(pool: &PgPool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO kv_entries (key, value, updated_at) VALUES ($1, $2, now())
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Store `value` under `key` only if the key is unused.
///
/// Returns `true` when the row was written.
pub async fn insert_if_absent(pool: &PgPool, key: &str, value: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO kv_entries (key, value, updated_at) VALUES ($1, $2, now())
         ON CONFLICT (key) DO NOTHING",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
