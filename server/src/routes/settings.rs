//! Settings store routes.

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::services::settings::{self, SettingsError};
use crate::state::AppState;

pub(crate) fn settings_error_to_status(err: &SettingsError) -> StatusCode {
    match err {
        SettingsError::NotFound(_) => StatusCode::NOT_FOUND,
        SettingsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_and_map(err: &SettingsError) -> StatusCode {
    let status = settings_error_to_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "settings operation failed");
    }
    status
}

/// `GET /api/settings` — every key as one JSON object.
pub async fn all_settings(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let value = settings::all_settings(&state.pool).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(value))
}

/// `GET /api/settings/:key` — one value, 404 when absent.
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let value = settings::get_setting(&state.pool, &key).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(value))
}

/// `PUT /api/settings/:key` — upsert an arbitrary JSON value.
pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    settings::put_setting(&state.pool, &key, &value).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
