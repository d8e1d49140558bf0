//! Database bootstrap.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gallery schema (mats, slot assignments, the source registry,
//! settings, TV mappings) is owned entirely by the migrations embedded
//! here; there is no out-of-band schema management. Startup refuses to
//! serve until every migration has applied, so handlers never see a
//! half-migrated database.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect a bounded pool and bring the schema up to date.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
