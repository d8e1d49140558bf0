#![allow(clippy::float_cmp)]

use super::*;
use crate::state::test_helpers;
use editor::template::{Slot, builtin_templates};

const EPSILON: f64 = 1e-9;

/// A template whose slot 0 resolves to exactly 800x450 canvas pixels.
fn small_slot_template() -> Template {
    Template {
        id: "test".into(),
        name: "Test".into(),
        slots: vec![Slot::new(0, 0.0, 0.0, 800.0 / 3840.0 * 100.0, 450.0 / 2160.0 * 100.0)],
    }
}

fn assignment(width: f64, height: f64) -> ImageAssignment {
    ImageAssignment::new(Uuid::new_v4(), width, height)
}

// --- resolve_template ---

#[test]
fn resolve_template_accepts_builtin_ids() {
    for template in builtin_templates() {
        assert!(resolve_template(&template.id).is_ok(), "{} should resolve", template.id);
    }
}

#[test]
fn resolve_template_rejects_unknown_id() {
    let err = resolve_template("no-such-layout").unwrap_err();
    assert!(matches!(err, MatError::UnknownTemplate(id) if id == "no-such-layout"));
}

// --- normalize_assignment ---

#[test]
fn normalize_clamps_oversized_scale() {
    // 1600x900 in an 800x450 slot: max scale 0.5 on both axes.
    let mut a = assignment(1600.0, 900.0);
    a.placement = editor::constraint::Placement::new(1.0, 1.0, 0.0, 0.0);

    let normalized = normalize_assignment(&small_slot_template(), 0, a).unwrap();
    assert!((normalized.placement.scale_x - 0.5).abs() < EPSILON);
    assert!((normalized.placement.scale_y - 0.5).abs() < EPSILON);
    assert!(normalized.placement.offset_x.abs() < EPSILON);
    assert!(normalized.placement.offset_y.abs() < EPSILON);
}

#[test]
fn normalize_clamps_runaway_offset() {
    // 400x450 in an 800x450 slot: scale 1.0 fits, X offset caps at the gap.
    let mut a = assignment(400.0, 450.0);
    a.placement = editor::constraint::Placement::new(1.0, 1.0, 1000.0, 0.0);

    let normalized = normalize_assignment(&small_slot_template(), 0, a).unwrap();
    assert!((normalized.placement.scale_x - 1.0).abs() < EPSILON);
    assert!((normalized.placement.offset_x - 400.0).abs() < EPSILON);
}

#[test]
fn normalize_rejects_out_of_range_index() {
    let err = normalize_assignment(&small_slot_template(), 7, assignment(100.0, 100.0)).unwrap_err();
    assert!(matches!(err, MatError::SlotOutOfRange { index: 7, .. }));
}

#[test]
fn normalize_keeps_in_bounds_placement_unchanged() {
    let mut a = assignment(400.0, 450.0);
    a.placement = editor::constraint::Placement::new(1.0, 1.0, 200.0, 0.0);

    let normalized = normalize_assignment(&small_slot_template(), 0, a.clone()).unwrap();
    assert_eq!(normalized.placement, a.placement);
}

// --- MatUpdate notes ---

#[test]
fn update_body_absent_notes_means_keep() {
    let update: MatUpdate = serde_json::from_str(r#"{"name":"New"}"#).unwrap();
    assert!(update.notes.is_none());
}

#[test]
fn update_body_null_notes_means_clear() {
    let update: MatUpdate = serde_json::from_str(r#"{"notes":null}"#).unwrap();
    assert_eq!(update.notes, Some(None));
}

#[test]
fn update_body_string_notes_means_replace() {
    let update: MatUpdate = serde_json::from_str(r#"{"notes":"by the window"}"#).unwrap();
    assert_eq!(update.notes, Some(Some("by the window".to_string())));
}

// --- decode_slot_row ---

#[test]
fn decode_slot_row_parses_stored_assignment() {
    let a = assignment(800.0, 600.0);
    let value = serde_json::to_value(&a).unwrap();
    let row = decode_slot_row(2, value, OffsetDateTime::UNIX_EPOCH).unwrap();
    assert_eq!(row.slot_index, 2);
    assert_eq!(row.assignment.source_id, a.source_id);
}

#[test]
fn decode_slot_row_flags_corrupt_json() {
    let err = decode_slot_row(1, serde_json::json!({"bogus": true}), OffsetDateTime::UNIX_EPOCH)
        .unwrap_err();
    assert!(matches!(err, MatError::CorruptAssignment(1, _)));
}

// --- live database ---

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn create_get_and_delete_mat_round_trip() {
    let pool = test_helpers::live_pool();
    let mat = create_mat(&pool, "Living Room", "grid-4", None).await.unwrap();

    let fetched = get_mat(&pool, mat.id).await.unwrap();
    assert_eq!(fetched.name, "Living Room");
    assert_eq!(fetched.template_id, "grid-4");

    delete_mat(&pool, mat.id).await.unwrap();
    assert!(matches!(get_mat(&pool, mat.id).await, Err(MatError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn template_change_drops_slot_rows() {
    let pool = test_helpers::live_pool();
    let mat = create_mat(&pool, "Hall", "grid-4", None).await.unwrap();
    put_slot(&pool, mat.id, 0, assignment(1600.0, 900.0)).await.unwrap();
    assert_eq!(list_slots(&pool, mat.id).await.unwrap().len(), 1);

    let update = MatUpdate { template_id: Some("single".into()), ..MatUpdate::default() };
    update_mat(&pool, mat.id, update).await.unwrap();
    assert!(list_slots(&pool, mat.id).await.unwrap().is_empty());

    delete_mat(&pool, mat.id).await.unwrap();
}
