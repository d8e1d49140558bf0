//! Source image registry routes.

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::services::pagination::{self, Page};
use crate::services::source::{self, NewSource, SourceError, SourceRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SourceListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub include_deleted: bool,
}

pub(crate) fn source_error_to_status(err: &SourceError) -> StatusCode {
    match err {
        SourceError::NotFound(_) => StatusCode::NOT_FOUND,
        SourceError::DuplicatePath(_) => StatusCode::CONFLICT,
        SourceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_and_map(err: &SourceError) -> StatusCode {
    let status = source_error_to_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "source operation failed");
    }
    status
}

/// `GET /api/sources` — paginated source registry.
pub async fn list_sources(
    State(state): State<AppState>,
    Query(query): Query<SourceListQuery>,
) -> Result<Json<Page<SourceRow>>, StatusCode> {
    let window = pagination::window(pagination::PageQuery { page: query.page, limit: query.limit });
    let page = source::list_sources(&state.pool, window, query.include_deleted)
        .await
        .map_err(|e| log_and_map(&e))?;
    Ok(Json(page))
}

/// `POST /api/sources` — register a file path with natural dimensions.
pub async fn register_source(
    State(state): State<AppState>,
    Json(body): Json<NewSource>,
) -> Result<(StatusCode, Json<SourceRow>), StatusCode> {
    let row = source::register_source(&state.pool, body).await.map_err(|e| log_and_map(&e))?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/sources/:id`.
pub async fn get_source(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SourceRow>, StatusCode> {
    let row = source::get_source(&state.pool, id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(row))
}

/// `DELETE /api/sources/:id` — soft delete; mats keep their references.
pub async fn delete_source(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    source::soft_delete_source(&state.pool, id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
