//! Mat service — CRUD over mats and their slot assignments.
//!
//! DESIGN
//! ======
//! A mat row stores only metadata plus the template id; slot assignments
//! live in `mat_slots` as one JSONB `ImageAssignment` per filled slot.
//! Every assignment that enters the database first passes through the
//! editor's constraint engine, so stored placements are valid by
//! construction — a malformed external update is clamped, never rejected.
//!
//! Changing a mat's template deletes its slot rows in the same transaction:
//! slot geometry is template-relative, so placements computed against the
//! old layout are meaningless under the new one.

#[cfg(test)]
#[path = "mat_test.rs"]
mod tests;

use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use editor::doc::ImageAssignment;
use editor::geometry::slot_pixel_size;
use editor::template::Template;

use super::pagination::{Page, Window};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MatError {
    #[error("mat not found: {0}")]
    NotFound(Uuid),
    #[error("unknown template id: {0}")]
    UnknownTemplate(String),
    #[error("slot index {index} out of range for template {template_id}")]
    SlotOutOfRange { template_id: String, index: u32 },
    #[error("stored assignment for slot {0} is corrupt: {1}")]
    CorruptAssignment(i32, serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row from the `mats` table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MatRow {
    pub id: Uuid,
    pub name: String,
    pub template_id: String,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One filled slot of a mat.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SlotRow {
    pub slot_index: u32,
    pub assignment: ImageAssignment,
    pub updated_at: OffsetDateTime,
}

/// Fields accepted by `PATCH /api/mats/:id`; absent fields are untouched.
///
/// `notes` is doubly optional so an explicit `"notes": null` clears the
/// column while an absent field leaves it alone.
#[derive(Debug, Default, serde::Deserialize)]
pub struct MatUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable_field")]
    pub notes: Option<Option<String>>,
    pub template_id: Option<String>,
}

/// Present-but-null deserializes to `Some(None)`; a missing field stays
/// `None` via the `default` on the field.
fn nullable_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

type MatTuple = (Uuid, String, String, Option<String>, OffsetDateTime, OffsetDateTime);

fn mat_from_tuple(t: MatTuple) -> MatRow {
    let (id, name, template_id, notes, created_at, updated_at) = t;
    MatRow { id, name, template_id, notes, created_at, updated_at }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Resolve a template id against the builtin catalog.
///
/// # Errors
///
/// Returns [`MatError::UnknownTemplate`] for ids outside the catalog.
pub fn resolve_template(template_id: &str) -> Result<Template, MatError> {
    Template::builtin(template_id).ok_or_else(|| MatError::UnknownTemplate(template_id.to_string()))
}

/// Run an incoming assignment's placement through the constraint engine for
/// the given slot.
///
/// # Errors
///
/// Returns [`MatError::SlotOutOfRange`] when the template lacks the index.
pub fn normalize_assignment(
    template: &Template,
    index: u32,
    mut assignment: ImageAssignment,
) -> Result<ImageAssignment, MatError> {
    let Some(slot) = template.slot(index) else {
        return Err(MatError::SlotOutOfRange { template_id: template.id.clone(), index });
    };
    let slot_size = slot_pixel_size(slot);
    assignment.placement =
        editor::constraint::constrain(assignment.natural_size(), slot_size, assignment.placement);
    Ok(assignment)
}

fn decode_slot_row(index: i32, value: serde_json::Value, updated_at: OffsetDateTime) -> Result<SlotRow, MatError> {
    let assignment = serde_json::from_value(value).map_err(|e| MatError::CorruptAssignment(index, e))?;
    Ok(SlotRow { slot_index: index.unsigned_abs(), assignment, updated_at })
}

// =============================================================================
// CRUD
// =============================================================================

/// List mats, most recently updated first.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn list_mats(pool: &PgPool, window: Window) -> Result<Page<MatRow>, MatError> {
    let (total,): (i64,) = sqlx::query_as("SELECT count(*) FROM mats").fetch_one(pool).await?;

    let rows = sqlx::query_as::<_, MatTuple>(
        "SELECT id, name, template_id, notes, created_at, updated_at
         FROM mats
         ORDER BY updated_at DESC
         LIMIT $1 OFFSET $2",
    )
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(pool)
    .await?;

    Ok(Page::new(rows.into_iter().map(mat_from_tuple).collect(), total, window))
}

/// Create a mat on a builtin template.
///
/// # Errors
///
/// Returns [`MatError::UnknownTemplate`] or a database error.
pub async fn create_mat(
    pool: &PgPool,
    name: &str,
    template_id: &str,
    notes: Option<&str>,
) -> Result<MatRow, MatError> {
    resolve_template(template_id)?;

    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, MatTuple>(
        "INSERT INTO mats (id, name, template_id, notes) VALUES ($1, $2, $3, $4)
         RETURNING id, name, template_id, notes, created_at, updated_at",
    )
    .bind(id)
    .bind(name)
    .bind(template_id)
    .bind(notes)
    .fetch_one(pool)
    .await?;

    info!(mat_id = %id, template_id, "mat created");
    Ok(mat_from_tuple(row))
}

/// Fetch one mat row.
///
/// # Errors
///
/// Returns [`MatError::NotFound`] or a database error.
pub async fn get_mat(pool: &PgPool, id: Uuid) -> Result<MatRow, MatError> {
    sqlx::query_as::<_, MatTuple>(
        "SELECT id, name, template_id, notes, created_at, updated_at FROM mats WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .map(mat_from_tuple)
    .ok_or(MatError::NotFound(id))
}

/// Fetch a mat's filled slots in slot order.
///
/// # Errors
///
/// Returns [`MatError::CorruptAssignment`] for undecodable JSONB, or a
/// database error.
pub async fn list_slots(pool: &PgPool, mat_id: Uuid) -> Result<Vec<SlotRow>, MatError> {
    let rows = sqlx::query_as::<_, (i32, serde_json::Value, OffsetDateTime)>(
        "SELECT slot_index, assignment, updated_at
         FROM mat_slots
         WHERE mat_id = $1
         ORDER BY slot_index ASC",
    )
    .bind(mat_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|(i, v, t)| decode_slot_row(i, v, t)).collect()
}

/// Apply a partial update. A template change clears every slot row in the
/// same transaction.
///
/// # Errors
///
/// Returns [`MatError::NotFound`], [`MatError::UnknownTemplate`], or a
/// database error.
pub async fn update_mat(pool: &PgPool, id: Uuid, update: MatUpdate) -> Result<MatRow, MatError> {
    if let Some(template_id) = update.template_id.as_deref() {
        resolve_template(template_id)?;
    }

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, MatTuple>(
        "UPDATE mats
         SET name = COALESCE($2, name),
             notes = CASE WHEN $3 THEN $4 ELSE notes END,
             template_id = COALESCE($5, template_id),
             updated_at = now()
         WHERE id = $1
         RETURNING id, name, template_id, notes, created_at, updated_at",
    )
    .bind(id)
    .bind(update.name.as_deref())
    .bind(update.notes.is_some())
    .bind(update.notes.as_ref().and_then(|n| n.as_deref()))
    .bind(update.template_id.as_deref())
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(MatError::NotFound(id))?;

    if update.template_id.is_some() {
        let cleared = sqlx::query("DELETE FROM mat_slots WHERE mat_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        info!(mat_id = %id, cleared, "template changed, slot assignments dropped");
    }

    tx.commit().await?;
    Ok(mat_from_tuple(row))
}

/// Delete a mat; slot rows cascade.
///
/// # Errors
///
/// Returns [`MatError::NotFound`] or a database error.
pub async fn delete_mat(pool: &PgPool, id: Uuid) -> Result<(), MatError> {
    let affected = sqlx::query("DELETE FROM mats WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(MatError::NotFound(id));
    }
    info!(mat_id = %id, "mat deleted");
    Ok(())
}

/// Upsert one slot assignment, normalized through the constraint engine.
/// Returns the assignment as stored.
///
/// # Errors
///
/// Returns [`MatError::NotFound`], [`MatError::SlotOutOfRange`], or a
/// database error.
pub async fn put_slot(
    pool: &PgPool,
    mat_id: Uuid,
    index: u32,
    assignment: ImageAssignment,
) -> Result<ImageAssignment, MatError> {
    let mat = get_mat(pool, mat_id).await?;
    let template = resolve_template(&mat.template_id)?;
    let normalized = normalize_assignment(&template, index, assignment)?;

    let value = serde_json::to_value(&normalized)
        .map_err(|e| MatError::CorruptAssignment(i32::try_from(index).unwrap_or(i32::MAX), e))?;

    sqlx::query(
        "INSERT INTO mat_slots (mat_id, slot_index, assignment)
         VALUES ($1, $2, $3)
         ON CONFLICT (mat_id, slot_index)
         DO UPDATE SET assignment = EXCLUDED.assignment, updated_at = now()",
    )
    .bind(mat_id)
    .bind(i32::try_from(index).unwrap_or(i32::MAX))
    .bind(&value)
    .execute(pool)
    .await?;

    info!(mat_id = %mat_id, slot = index, source_id = %normalized.source_id, "slot assigned");
    Ok(normalized)
}

/// Clear one slot. Clearing an already-empty slot is not an error, but the
/// mat must exist and the index must be valid for its template.
///
/// # Errors
///
/// Returns [`MatError::NotFound`], [`MatError::SlotOutOfRange`], or a
/// database error.
pub async fn clear_slot(pool: &PgPool, mat_id: Uuid, index: u32) -> Result<(), MatError> {
    let mat = get_mat(pool, mat_id).await?;
    let template = resolve_template(&mat.template_id)?;
    if template.slot(index).is_none() {
        return Err(MatError::SlotOutOfRange { template_id: template.id, index });
    }

    sqlx::query("DELETE FROM mat_slots WHERE mat_id = $1 AND slot_index = $2")
        .bind(mat_id)
        .bind(i32::try_from(index).unwrap_or(i32::MAX))
        .execute(pool)
        .await?;

    info!(mat_id = %mat_id, slot = index, "slot cleared");
    Ok(())
}
