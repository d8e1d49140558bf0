//! TV content mapping routes.

#[cfg(test)]
#[path = "tv_test.rs"]
mod tests;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::services::pagination::{self, Page, PageQuery};
use crate::services::tv::{self, MappingRow, NewMapping, RefreshOutcome, SyncStatus, TvError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UpdateMappingBody {
    pub sync_status: SyncStatus,
}

/// Body of `POST /api/tv/refresh`: the content ids currently on the device.
#[derive(Deserialize)]
pub struct RefreshBody {
    pub tv_content_ids: Vec<String>,
}

pub(crate) fn tv_error_to_status(err: &TvError) -> StatusCode {
    match err {
        TvError::NotFound(_) => StatusCode::NOT_FOUND,
        TvError::DuplicateContentId(_) => StatusCode::CONFLICT,
        TvError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_and_map(err: &TvError) -> StatusCode {
    let status = tv_error_to_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "tv mapping operation failed");
    }
    status
}

/// `GET /api/tv/mappings` — paginated mapping list.
pub async fn list_mappings(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<MappingRow>>, StatusCode> {
    let page = tv::list_mappings(&state.pool, pagination::window(query))
        .await
        .map_err(|e| log_and_map(&e))?;
    Ok(Json(page))
}

/// `POST /api/tv/mappings` — record an upload.
pub async fn create_mapping(
    State(state): State<AppState>,
    Json(body): Json<NewMapping>,
) -> Result<(StatusCode, Json<MappingRow>), StatusCode> {
    let row = tv::create_mapping(&state.pool, body).await.map_err(|e| log_and_map(&e))?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/tv/mappings/:id` — update sync status.
pub async fn update_mapping(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMappingBody>,
) -> Result<Json<MappingRow>, StatusCode> {
    let row = tv::set_status(&state.pool, id, body.sync_status)
        .await
        .map_err(|e| log_and_map(&e))?;
    Ok(Json(row))
}

/// `DELETE /api/tv/mappings/:id`.
pub async fn delete_mapping(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    tv::delete_mapping(&state.pool, id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/tv/refresh` — reconcile mappings against the device listing.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshBody>,
) -> Result<Json<RefreshOutcome>, StatusCode> {
    let outcome = tv::refresh(&state.pool, &body.tv_content_ids)
        .await
        .map_err(|e| log_and_map(&e))?;
    Ok(Json(outcome))
}
