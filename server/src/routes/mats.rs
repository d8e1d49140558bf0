//! Mat routes: CRUD, slot assignment, template catalog, and rendering.

#[cfg(test)]
#[path = "mats_test.rs"]
mod tests;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use editor::doc::ImageAssignment;
use editor::template::{Template, builtin_templates};

use crate::services::compose::{self, ComposeError};
use crate::services::mat::{self, MatError, MatRow, MatUpdate, SlotRow};
use crate::services::pagination::{self, Page, PageQuery};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateMatBody {
    pub name: String,
    pub template_id: String,
    pub notes: Option<String>,
}

/// A mat with its filled slots, as returned by `GET /api/mats/:id`.
#[derive(Serialize)]
pub struct MatDetailResponse {
    #[serde(flatten)]
    pub mat: MatRow,
    pub slots: Vec<SlotRow>,
}

pub(crate) fn mat_error_to_status(err: &MatError) -> StatusCode {
    match err {
        MatError::NotFound(_) | MatError::SlotOutOfRange { .. } => StatusCode::NOT_FOUND,
        MatError::UnknownTemplate(_) => StatusCode::BAD_REQUEST,
        MatError::CorruptAssignment(..) | MatError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn compose_error_to_status(err: &ComposeError) -> StatusCode {
    match err {
        ComposeError::Mat(e) => mat_error_to_status(e),
        ComposeError::Source(crate::services::source::SourceError::NotFound(_)) => {
            StatusCode::CONFLICT
        }
        ComposeError::Source(_) | ComposeError::ReadFile { .. } | ComposeError::Render(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn log_and_map(err: &MatError) -> StatusCode {
    let status = mat_error_to_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "mat operation failed");
    }
    status
}

/// `GET /api/templates` — the builtin template catalog.
pub async fn list_templates() -> Json<Vec<Template>> {
    Json(builtin_templates())
}

/// `GET /api/mats` — paginated mat list.
pub async fn list_mats(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<MatRow>>, StatusCode> {
    let page = mat::list_mats(&state.pool, pagination::window(query))
        .await
        .map_err(|e| log_and_map(&e))?;
    Ok(Json(page))
}

/// `POST /api/mats` — create a mat on a builtin template.
pub async fn create_mat(
    State(state): State<AppState>,
    Json(body): Json<CreateMatBody>,
) -> Result<(StatusCode, Json<MatRow>), StatusCode> {
    let row = mat::create_mat(&state.pool, &body.name, &body.template_id, body.notes.as_deref())
        .await
        .map_err(|e| log_and_map(&e))?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/mats/:id` — mat metadata plus filled slots.
pub async fn get_mat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatDetailResponse>, StatusCode> {
    let mat = mat::get_mat(&state.pool, id).await.map_err(|e| log_and_map(&e))?;
    let slots = mat::list_slots(&state.pool, id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(MatDetailResponse { mat, slots }))
}

/// `PATCH /api/mats/:id` — rename, edit notes, or switch template.
pub async fn update_mat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MatUpdate>,
) -> Result<Json<MatRow>, StatusCode> {
    let row = mat::update_mat(&state.pool, id, body).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(row))
}

/// `DELETE /api/mats/:id`.
pub async fn delete_mat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    mat::delete_mat(&state.pool, id).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `PUT /api/mats/:id/slots/:index` — assign an image to a slot.
///
/// The placement in the body is normalized through the editor's constraint
/// engine; the response carries the assignment as stored.
pub async fn put_slot(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, u32)>,
    Json(body): Json<ImageAssignment>,
) -> Result<Json<ImageAssignment>, StatusCode> {
    let stored = mat::put_slot(&state.pool, id, index, body).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(stored))
}

/// `DELETE /api/mats/:id/slots/:index` — clear a slot.
pub async fn clear_slot(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, u32)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    mat::clear_slot(&state.pool, id, index).await.map_err(|e| log_and_map(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `GET /api/mats/:id/render` — composite the mat and respond `image/png`.
pub async fn render_mat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, StatusCode> {
    let png = compose::render_mat(&state.pool, &state.data_dir, id).await.map_err(|e| {
        let status = compose_error_to_status(&e);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(mat_id = %id, error = %e, "render failed");
        }
        status
    })?;
    Ok(([(CONTENT_TYPE, "image/png")], png).into_response())
}
