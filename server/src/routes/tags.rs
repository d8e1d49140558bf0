//! Tag routes: tag CRUD plus source-image association.

#[cfg(test)]
#[path = "tags_test.rs"]
mod tests;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::services::tag::{self, NewTag, TagError, TagRow, TagUpdate};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TagListQuery {
    /// Name-prefix filter.
    pub search: Option<String>,
}

pub(crate) fn tag_error_to_status(err: &TagError) -> StatusCode {
    match err {
        TagError::NotFound(_) | TagError::MissingReference => StatusCode::NOT_FOUND,
        TagError::NameTaken(_) => StatusCode::CONFLICT,
        TagError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_and_map(err: &TagError) -> StatusCode {
    let status = tag_error_to_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "tag operation failed");
    }
    status
}

/// `GET /api/tags` — all tags sorted by name, optionally `?search=` prefix.
pub async fn list_tags(
    State(state): State<AppState>,
    Query(query): Query<TagListQuery>,
) -> Result<Json<Vec<TagRow>>, StatusCode> {
    let rows = tag::list_tags(&state.pool, query.search.as_deref())
        .await
        .map_err(|e| log_and_map(&e))?;
    Ok(Json(rows))
}

/// `POST /api/tags` — get-or-create by name.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(body): Json<NewTag>,
) -> Result<(StatusCode, Json<TagRow>), StatusCode> {
    let row = tag::create_tag(&state.pool, body).await.map_err(|e| log_and_map(&e))?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/tags/:id`.
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TagRow>, StatusCode> {
    let row = tag::get_tag(&state.pool, id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(row))
}

/// `PATCH /api/tags/:id` — rename and/or recolor.
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TagUpdate>,
) -> Result<Json<TagRow>, StatusCode> {
    let row = tag::update_tag(&state.pool, id, body).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(row))
}

/// `DELETE /api/tags/:id` — associations cascade.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    tag::delete_tag(&state.pool, id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `GET /api/sources/:id/tags` — tags attached to one source image.
pub async fn source_tags(
    State(state): State<AppState>,
    Path(source_id): Path<Uuid>,
) -> Result<Json<Vec<TagRow>>, StatusCode> {
    let rows = tag::tags_for_source(&state.pool, source_id)
        .await
        .map_err(|e| log_and_map(&e))?;
    Ok(Json(rows))
}

/// `PUT /api/sources/:id/tags/:tag_id` — attach; idempotent.
pub async fn tag_source(
    State(state): State<AppState>,
    Path((source_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    tag::tag_source(&state.pool, source_id, tag_id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `DELETE /api/sources/:id/tags/:tag_id` — detach; idempotent.
pub async fn untag_source(
    State(state): State<AppState>,
    Path((source_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    tag::untag_source(&state.pool, source_id, tag_id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
