//! Source image registry — files the editor can place into slots.
//!
//! DESIGN
//! ======
//! Rows record a file path (relative to `DATA_DIR`) plus the decoded natural
//! dimensions; the compositor reads the actual bytes only when rendering.
//! Deletion is soft: mats keep referencing their `source_id`s, so rows are
//! flagged rather than removed and hidden from listings by default.

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;

use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::pagination::{Page, Window};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source image not found: {0}")]
    NotFound(Uuid),
    #[error("a source with filepath {0:?} is already registered")]
    DuplicatePath(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row from the `source_images` table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SourceRow {
    pub id: Uuid,
    pub filename: String,
    pub filepath: String,
    pub width: i32,
    pub height: i32,
    pub taken_at: Option<OffsetDateTime>,
    pub deleted: bool,
    pub created_at: OffsetDateTime,
}

/// Body of `POST /api/sources`.
#[derive(Debug, serde::Deserialize)]
pub struct NewSource {
    pub filename: String,
    pub filepath: String,
    pub width: i32,
    pub height: i32,
    pub taken_at: Option<OffsetDateTime>,
}

type SourceTuple = (Uuid, String, String, i32, i32, Option<OffsetDateTime>, bool, OffsetDateTime);

fn source_from_tuple(t: SourceTuple) -> SourceRow {
    let (id, filename, filepath, width, height, taken_at, deleted, created_at) = t;
    SourceRow { id, filename, filepath, width, height, taken_at, deleted, created_at }
}

const SOURCE_COLUMNS: &str = "id, filename, filepath, width, height, taken_at, deleted, created_at";

// =============================================================================
// OPERATIONS
// =============================================================================

/// List registered sources, newest first. Soft-deleted rows appear only
/// when `include_deleted` is set.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn list_sources(
    pool: &PgPool,
    window: Window,
    include_deleted: bool,
) -> Result<Page<SourceRow>, SourceError> {
    let (total,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM source_images WHERE deleted = FALSE OR $1")
            .bind(include_deleted)
            .fetch_one(pool)
            .await?;

    let rows = sqlx::query_as::<_, SourceTuple>(&format!(
        "SELECT {SOURCE_COLUMNS}
         FROM source_images
         WHERE deleted = FALSE OR $1
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3"
    ))
    .bind(include_deleted)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(pool)
    .await?;

    Ok(Page::new(rows.into_iter().map(source_from_tuple).collect(), total, window))
}

/// Register a new source file.
///
/// # Errors
///
/// Returns [`SourceError::DuplicatePath`] when the filepath is already
/// registered, or a database error.
pub async fn register_source(pool: &PgPool, new: NewSource) -> Result<SourceRow, SourceError> {
    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, SourceTuple>(&format!(
        "INSERT INTO source_images (id, filename, filepath, width, height, taken_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {SOURCE_COLUMNS}"
    ))
    .bind(id)
    .bind(&new.filename)
    .bind(&new.filepath)
    .bind(new.width)
    .bind(new.height)
    .bind(new.taken_at)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            SourceError::DuplicatePath(new.filepath.clone())
        }
        _ => SourceError::Database(e),
    })?;

    info!(source_id = %id, filepath = %new.filepath, "source registered");
    Ok(source_from_tuple(row))
}

/// Fetch one source row, deleted or not.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] or a database error.
pub async fn get_source(pool: &PgPool, id: Uuid) -> Result<SourceRow, SourceError> {
    sqlx::query_as::<_, SourceTuple>(&format!(
        "SELECT {SOURCE_COLUMNS} FROM source_images WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .map(source_from_tuple)
    .ok_or(SourceError::NotFound(id))
}

/// Soft-delete a source. Idempotent on already-deleted rows.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] or a database error.
pub async fn soft_delete_source(pool: &PgPool, id: Uuid) -> Result<(), SourceError> {
    let affected = sqlx::query("UPDATE source_images SET deleted = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(SourceError::NotFound(id));
    }
    info!(source_id = %id, "source soft-deleted");
    Ok(())
}
