//! Tag service — named labels for organizing source images.
//!
//! DESIGN
//! ======
//! Tags are flat: a unique name plus an optional UI display color, linked
//! to sources through a plain junction table. Creation is get-or-create on
//! the name so repeated tagging from the UI never conflicts; renames are
//! the only path that can collide. Association writes are idempotent
//! (`ON CONFLICT DO NOTHING` / unconditional delete), since the panel
//! toggles tags without knowing their current state.

#[cfg(test)]
#[path = "tag_test.rs"]
mod tests;

use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("tag not found: {0}")]
    NotFound(Uuid),
    #[error("a tag named {0:?} already exists")]
    NameTaken(String),
    #[error("source or tag referenced by the association does not exist")]
    MissingReference,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row from the `tags` table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TagRow {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Body of `POST /api/tags`.
#[derive(Debug, serde::Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: Option<String>,
}

/// Body of `PATCH /api/tags/:id`; absent fields are untouched.
#[derive(Debug, Default, serde::Deserialize)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

type TagTuple = (Uuid, String, Option<String>, OffsetDateTime);

fn tag_from_tuple(t: TagTuple) -> TagRow {
    let (id, name, color, created_at) = t;
    TagRow { id, name, color, created_at }
}

const TAG_COLUMNS: &str = "id, name, color, created_at";

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Build the `LIKE` pattern for a name-prefix search, escaping the
/// wildcard metacharacters so user input matches literally.
#[must_use]
pub fn search_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// CRUD
// =============================================================================

/// List tags sorted by name, optionally filtered by name prefix.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_tags(pool: &PgPool, search: Option<&str>) -> Result<Vec<TagRow>, TagError> {
    let rows = match search {
        Some(prefix) => {
            sqlx::query_as::<_, TagTuple>(&format!(
                "SELECT {TAG_COLUMNS} FROM tags WHERE name ILIKE $1 ORDER BY name ASC"
            ))
            .bind(search_pattern(prefix))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, TagTuple>(&format!(
                "SELECT {TAG_COLUMNS} FROM tags ORDER BY name ASC"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(tag_from_tuple).collect())
}

/// Get-or-create a tag by name. An existing tag keeps its color.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn create_tag(pool: &PgPool, new: NewTag) -> Result<TagRow, TagError> {
    // Insert the new row, but on a name collision return the existing tag
    // untouched; two panels creating "beach" concurrently must converge.
    let row = sqlx::query_as::<_, TagTuple>(&format!(
        "INSERT INTO tags (id, name, color) VALUES ($1, $2, $3)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING {TAG_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(new.color.as_deref())
    .fetch_one(pool)
    .await?;

    info!(tag = %new.name, "tag ensured");
    Ok(tag_from_tuple(row))
}

/// Fetch one tag.
///
/// # Errors
///
/// Returns [`TagError::NotFound`] or a database error.
pub async fn get_tag(pool: &PgPool, id: Uuid) -> Result<TagRow, TagError> {
    sqlx::query_as::<_, TagTuple>(&format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(tag_from_tuple)
        .ok_or(TagError::NotFound(id))
}

/// Rename a tag and/or change its color.
///
/// # Errors
///
/// Returns [`TagError::NotFound`], [`TagError::NameTaken`] when the new
/// name belongs to another tag, or a database error.
pub async fn update_tag(pool: &PgPool, id: Uuid, update: TagUpdate) -> Result<TagRow, TagError> {
    let row = sqlx::query_as::<_, TagTuple>(&format!(
        "UPDATE tags
         SET name = COALESCE($2, name), color = COALESCE($3, color)
         WHERE id = $1
         RETURNING {TAG_COLUMNS}"
    ))
    .bind(id)
    .bind(update.name.as_deref())
    .bind(update.color.as_deref())
    .fetch_optional(pool)
    .await
    .map_err(|e| match (&e, update.name.as_deref()) {
        (sqlx::Error::Database(db), Some(name)) if db.is_unique_violation() => {
            TagError::NameTaken(name.to_string())
        }
        _ => TagError::Database(e),
    })?
    .ok_or(TagError::NotFound(id))?;

    Ok(tag_from_tuple(row))
}

/// Delete a tag; associations cascade.
///
/// # Errors
///
/// Returns [`TagError::NotFound`] or a database error.
pub async fn delete_tag(pool: &PgPool, id: Uuid) -> Result<(), TagError> {
    let affected = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(TagError::NotFound(id));
    }
    info!(tag_id = %id, "tag deleted");
    Ok(())
}

// =============================================================================
// SOURCE ASSOCIATION
// =============================================================================

/// Attach a tag to a source image. Idempotent.
///
/// # Errors
///
/// Returns [`TagError::MissingReference`] when either side does not exist,
/// or a database error.
pub async fn tag_source(pool: &PgPool, source_id: Uuid, tag_id: Uuid) -> Result<(), TagError> {
    sqlx::query(
        "INSERT INTO source_image_tags (source_id, tag_id) VALUES ($1, $2)
         ON CONFLICT DO NOTHING",
    )
    .bind(source_id)
    .bind(tag_id)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => TagError::MissingReference,
        _ => TagError::Database(e),
    })?;

    Ok(())
}

/// Detach a tag from a source image. Idempotent; detaching an absent
/// association is not an error.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn untag_source(pool: &PgPool, source_id: Uuid, tag_id: Uuid) -> Result<(), TagError> {
    sqlx::query("DELETE FROM source_image_tags WHERE source_id = $1 AND tag_id = $2")
        .bind(source_id)
        .bind(tag_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// All tags attached to a source image, sorted by name.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn tags_for_source(pool: &PgPool, source_id: Uuid) -> Result<Vec<TagRow>, TagError> {
    let rows = sqlx::query_as::<_, TagTuple>(
        "SELECT t.id, t.name, t.color, t.created_at
         FROM tags t
         JOIN source_image_tags st ON st.tag_id = t.id
         WHERE st.source_id = $1
         ORDER BY t.name ASC",
    )
    .bind(source_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(tag_from_tuple).collect())
}
