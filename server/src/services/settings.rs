//! Settings service — arbitrary JSON values keyed by string.
//!
//! The UI stores panel preferences here (active template id, background
//! color, filter panel defaults); the server never interprets the values.

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use sqlx::PgPool;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("setting not found: {0:?}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// All settings flattened into one JSON object.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn all_settings(pool: &PgPool) -> Result<serde_json::Value, SettingsError> {
    let rows = sqlx::query_as::<_, (String, serde_json::Value)>(
        "SELECT key, value FROM settings ORDER BY key ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(serde_json::Value::Object(rows.into_iter().collect()))
}

/// One setting's value.
///
/// # Errors
///
/// Returns [`SettingsError::NotFound`] or a database error.
pub async fn get_setting(pool: &PgPool, key: &str) -> Result<serde_json::Value, SettingsError> {
    sqlx::query_as::<_, (serde_json::Value,)>("SELECT value FROM settings WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?
        .map(|(v,)| v)
        .ok_or_else(|| SettingsError::NotFound(key.to_string()))
}

/// Upsert one setting.
///
/// # Errors
///
/// Returns a database error if the write fails.
pub async fn put_setting(
    pool: &PgPool,
    key: &str,
    value: &serde_json::Value,
) -> Result<(), SettingsError> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES ($1, $2)
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    info!(key, "setting written");
    Ok(())
}
