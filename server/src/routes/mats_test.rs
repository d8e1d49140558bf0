use super::*;

use crate::services::source::SourceError;

#[test]
fn mat_not_found_maps_to_404() {
    let err = MatError::NotFound(Uuid::nil());
    assert_eq!(mat_error_to_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn slot_out_of_range_maps_to_404() {
    let err = MatError::SlotOutOfRange { template_id: "grid-4".into(), index: 9 };
    assert_eq!(mat_error_to_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn unknown_template_maps_to_400() {
    let err = MatError::UnknownTemplate("nope".into());
    assert_eq!(mat_error_to_status(&err), StatusCode::BAD_REQUEST);
}

#[test]
fn database_error_maps_to_500() {
    let err = MatError::Database(sqlx::Error::PoolClosed);
    assert_eq!(mat_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn unregistered_source_maps_to_409() {
    let err = ComposeError::Source(SourceError::NotFound(Uuid::nil()));
    assert_eq!(compose_error_to_status(&err), StatusCode::CONFLICT);
}

#[test]
fn compose_mat_errors_reuse_mat_mapping() {
    let err = ComposeError::Mat(MatError::NotFound(Uuid::nil()));
    assert_eq!(compose_error_to_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn unreadable_source_file_maps_to_500() {
    let err = ComposeError::ReadFile {
        path: "photos/a.jpg".into(),
        source: std::io::Error::other("gone"),
    };
    assert_eq!(compose_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn list_templates_returns_catalog() {
    let Json(templates) = list_templates().await;
    assert!(templates.len() >= 5);
    assert!(templates.iter().any(|t| t.id == "single"));
}

#[test]
fn mat_detail_response_flattens_mat_fields() {
    let mat = MatRow {
        id: Uuid::nil(),
        name: "Hall".into(),
        template_id: "single".into(),
        notes: None,
        created_at: time::OffsetDateTime::UNIX_EPOCH,
        updated_at: time::OffsetDateTime::UNIX_EPOCH,
    };
    let json = serde_json::to_value(&MatDetailResponse { mat, slots: vec![] }).unwrap();
    assert_eq!(json["name"], "Hall");
    assert_eq!(json["template_id"], "single");
    assert!(json["slots"].as_array().unwrap().is_empty());
}
