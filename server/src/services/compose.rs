//! Compose service — flatten a stored mat to a PNG.
//!
//! DESIGN
//! ======
//! The database holds a mat's template id and slot assignments; the pixels
//! live as files under `DATA_DIR`. Rendering rebuilds an editor `MatDoc`
//! from the rows (re-normalizing every placement on the way in), decodes
//! each referenced source file, and hands the lot to the editor's software
//! compositor.

#[cfg(test)]
#[path = "compose_test.rs"]
mod tests;

use std::collections::HashMap;
use std::path::Path;

use image::{Rgba, RgbaImage};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use editor::consts::DEFAULT_BACKGROUND;
use editor::doc::MatDoc;
use editor::render;
use editor::template::Template;

use super::mat::{self, MatError, SlotRow};
use super::source::{self, SourceError};

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Mat(#[from] MatError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("reading source file {path:?}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Render(#[from] render::RenderError),
}

/// Rebuild an editor document from stored slot rows.
///
/// Pure. Rows whose index the template lacks are dropped (this can happen
/// when rows were written under an older template id and the mats table was
/// edited out of band); `MatDoc::assign` re-normalizes every placement.
#[must_use]
pub fn build_doc(template: Template, slots: Vec<SlotRow>) -> MatDoc {
    let mut doc = MatDoc::new(template);
    for row in slots {
        if !doc.assign(row.slot_index, row.assignment) {
            warn!(slot = row.slot_index, "dropping slot row outside template");
        }
    }
    doc
}

/// Every distinct source id a document references.
#[must_use]
pub fn referenced_sources(doc: &MatDoc) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = doc.iter().map(|(_, a)| a.source_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Render a stored mat to PNG bytes.
///
/// # Errors
///
/// Fails when the mat is missing, a referenced source is unregistered, a
/// source file cannot be read or decoded, or encoding fails.
pub async fn render_mat(pool: &PgPool, data_dir: &Path, mat_id: Uuid) -> Result<Vec<u8>, ComposeError> {
    let mat = mat::get_mat(pool, mat_id).await?;
    let template = mat::resolve_template(&mat.template_id)?;
    let slots = mat::list_slots(pool, mat_id).await?;
    let doc = build_doc(template, slots);

    let mut sources: HashMap<Uuid, RgbaImage> = HashMap::new();
    for source_id in referenced_sources(&doc) {
        let row = source::get_source(pool, source_id).await?;
        let path = data_dir.join(&row.filepath);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ComposeError::ReadFile { path: row.filepath.clone(), source: e })?;
        sources.insert(source_id, render::decode_image(&bytes)?);
    }

    debug!(mat_id = %mat_id, slots = doc.filled_count(), sources = sources.len(), "compositing mat");
    let canvas = render::compose(&doc, &sources, Rgba(DEFAULT_BACKGROUND))?;
    Ok(render::encode_png(&canvas)?)
}
