//! TV content mapping service — which mats live on the television.
//!
//! DESIGN
//! ======
//! Uploading a rendered mat to the TV's content store happens out of band;
//! this service only tracks the resulting content ids and their sync state.
//! `refresh` reconciles the database against the id list read off the
//! device: the diff is computed by a pure planning function and applied in
//! one transaction, so a failed refresh leaves the table untouched.

#[cfg(test)]
#[path = "tv_test.rs"]
mod tests;

use std::collections::HashSet;

use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::pagination::{Page, Window};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TvError {
    #[error("tv content mapping not found: {0}")]
    NotFound(Uuid),
    #[error("duplicate tv content id: {0:?}")]
    DuplicateContentId(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Upload/sync state of one mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
    Failed,
    /// Content found on the device with no matching upload record.
    Manual,
}

impl SyncStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Failed => "failed",
            Self::Manual => "manual",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "synced" => Some(Self::Synced),
            "failed" => Some(Self::Failed),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// Row from the `tv_content_mappings` table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MappingRow {
    pub id: Uuid,
    pub mat_id: Option<Uuid>,
    pub tv_content_id: String,
    pub sync_status: SyncStatus,
    pub uploaded_at: Option<OffsetDateTime>,
    pub last_verified_at: Option<OffsetDateTime>,
}

/// Body of `POST /api/tv/mappings`.
#[derive(Debug, serde::Deserialize)]
pub struct NewMapping {
    pub mat_id: Option<Uuid>,
    pub tv_content_id: String,
    #[serde(default = "default_new_status")]
    pub sync_status: SyncStatus,
}

fn default_new_status() -> SyncStatus {
    SyncStatus::Pending
}

/// What a refresh would do, before touching the database.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RefreshPlan {
    /// Mapping ids whose content is gone from the device.
    pub remove: Vec<Uuid>,
    /// Device content ids with no mapping row yet.
    pub add: Vec<String>,
    /// Mapping ids present on both sides, to be confirmed synced.
    pub verify: Vec<Uuid>,
}

/// Counters reported by `POST /api/tv/refresh`.
#[derive(Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RefreshOutcome {
    pub removed: u64,
    pub added: u64,
    pub updated: u64,
}

type MappingTuple = (Uuid, Option<Uuid>, String, String, Option<OffsetDateTime>, Option<OffsetDateTime>);

fn mapping_from_tuple(t: MappingTuple) -> MappingRow {
    let (id, mat_id, tv_content_id, status, uploaded_at, last_verified_at) = t;
    MappingRow {
        id,
        mat_id,
        tv_content_id,
        // Rows are only ever written through SyncStatus, so unknown text
        // means manual intervention happened; treat it as such.
        sync_status: SyncStatus::from_str(&status).unwrap_or(SyncStatus::Manual),
        uploaded_at,
        last_verified_at,
    }
}

// =============================================================================
// PLANNING
// =============================================================================

/// Diff known mappings against the content ids read off the device.
///
/// Pure; ordering of the output follows the input orderings, so the result
/// is deterministic for a given database state and device listing. The
/// device can report the same content id more than once; each distinct id
/// is planned as a single insert so applying the plan never trips the
/// unique constraint on `tv_content_id`.
#[must_use]
pub fn plan_refresh(known: &[(Uuid, String)], device_ids: &[String]) -> RefreshPlan {
    let on_device: HashSet<&str> = device_ids.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = known.iter().map(|(_, cid)| cid.as_str()).collect();

    let mut plan = RefreshPlan::default();
    for (id, content_id) in known {
        if on_device.contains(content_id.as_str()) {
            plan.verify.push(*id);
        } else {
            plan.remove.push(*id);
        }
    }
    for content_id in device_ids {
        if seen.insert(content_id.as_str()) {
            plan.add.push(content_id.clone());
        }
    }
    plan
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// List mappings, most recently uploaded first.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn list_mappings(pool: &PgPool, window: Window) -> Result<Page<MappingRow>, TvError> {
    let (total,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM tv_content_mappings").fetch_one(pool).await?;

    let rows = sqlx::query_as::<_, MappingTuple>(
        "SELECT id, mat_id, tv_content_id, sync_status, uploaded_at, last_verified_at
         FROM tv_content_mappings
         ORDER BY uploaded_at DESC NULLS LAST, tv_content_id ASC
         LIMIT $1 OFFSET $2",
    )
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(pool)
    .await?;

    Ok(Page::new(rows.into_iter().map(mapping_from_tuple).collect(), total, window))
}

/// Record an upload.
///
/// # Errors
///
/// Returns [`TvError::DuplicateContentId`] for an already-tracked content
/// id, or a database error.
pub async fn create_mapping(pool: &PgPool, new: NewMapping) -> Result<MappingRow, TvError> {
    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, MappingTuple>(
        "INSERT INTO tv_content_mappings (id, mat_id, tv_content_id, sync_status, uploaded_at)
         VALUES ($1, $2, $3, $4, now())
         RETURNING id, mat_id, tv_content_id, sync_status, uploaded_at, last_verified_at",
    )
    .bind(id)
    .bind(new.mat_id)
    .bind(&new.tv_content_id)
    .bind(new.sync_status.as_str())
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            TvError::DuplicateContentId(new.tv_content_id.clone())
        }
        _ => TvError::Database(e),
    })?;

    info!(mapping_id = %id, tv_content_id = %new.tv_content_id, "tv mapping created");
    Ok(mapping_from_tuple(row))
}

/// Update a mapping's sync status.
///
/// # Errors
///
/// Returns [`TvError::NotFound`] or a database error.
pub async fn set_status(pool: &PgPool, id: Uuid, status: SyncStatus) -> Result<MappingRow, TvError> {
    sqlx::query_as::<_, MappingTuple>(
        "UPDATE tv_content_mappings SET sync_status = $2 WHERE id = $1
         RETURNING id, mat_id, tv_content_id, sync_status, uploaded_at, last_verified_at",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?
    .map(mapping_from_tuple)
    .ok_or(TvError::NotFound(id))
}

/// Delete a mapping.
///
/// # Errors
///
/// Returns [`TvError::NotFound`] or a database error.
pub async fn delete_mapping(pool: &PgPool, id: Uuid) -> Result<(), TvError> {
    let affected = sqlx::query("DELETE FROM tv_content_mappings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(TvError::NotFound(id));
    }
    Ok(())
}

/// Reconcile mappings against the device's current content listing, in one
/// transaction.
///
/// # Errors
///
/// Returns a database error; on error nothing is applied.
pub async fn refresh(pool: &PgPool, device_ids: &[String]) -> Result<RefreshOutcome, TvError> {
    let known = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT id, tv_content_id FROM tv_content_mappings ORDER BY tv_content_id ASC",
    )
    .fetch_all(pool)
    .await?;

    let plan = plan_refresh(&known, device_ids);
    let mut outcome = RefreshOutcome::default();
    let mut tx = pool.begin().await?;

    for id in &plan.remove {
        sqlx::query("DELETE FROM tv_content_mappings WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        outcome.removed += 1;
    }
    for content_id in &plan.add {
        sqlx::query(
            "INSERT INTO tv_content_mappings (id, tv_content_id, sync_status)
             VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(content_id)
        .bind(SyncStatus::Manual.as_str())
        .execute(&mut *tx)
        .await?;
        outcome.added += 1;
    }
    for id in &plan.verify {
        sqlx::query(
            "UPDATE tv_content_mappings
             SET sync_status = $2, last_verified_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(SyncStatus::Synced.as_str())
        .execute(&mut *tx)
        .await?;
        outcome.updated += 1;
    }

    tx.commit().await?;
    info!(removed = outcome.removed, added = outcome.added, updated = outcome.updated, "tv refresh applied");
    Ok(outcome)
}
