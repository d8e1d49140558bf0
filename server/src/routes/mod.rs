//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One flat API router: mats (with slot and render sub-resources), the
//! source image registry with its tag vocabulary, the settings store, and
//! TV content mappings.
//! Handlers stay thin; all SQL lives in the service layer.

pub mod mats;
pub mod settings;
pub mod sources;
pub mod tags;
pub mod tv;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/templates", get(mats::list_templates))
        .route("/api/mats", get(mats::list_mats).post(mats::create_mat))
        .route(
            "/api/mats/{id}",
            get(mats::get_mat).patch(mats::update_mat).delete(mats::delete_mat),
        )
        .route(
            "/api/mats/{id}/slots/{index}",
            axum::routing::put(mats::put_slot).delete(mats::clear_slot),
        )
        .route("/api/mats/{id}/render", get(mats::render_mat))
        .route("/api/sources", get(sources::list_sources).post(sources::register_source))
        .route("/api/sources/{id}", get(sources::get_source).delete(sources::delete_source))
        .route("/api/sources/{id}/tags", get(tags::source_tags))
        .route(
            "/api/sources/{id}/tags/{tag_id}",
            axum::routing::put(tags::tag_source).delete(tags::untag_source),
        )
        .route("/api/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/api/tags/{id}",
            get(tags::get_tag).patch(tags::update_tag).delete(tags::delete_tag),
        )
        .route("/api/settings", get(settings::all_settings))
        .route(
            "/api/settings/{key}",
            get(settings::get_setting).put(settings::put_setting),
        )
        .route("/api/tv/mappings", get(tv::list_mappings).post(tv::create_mapping))
        .route(
            "/api/tv/mappings/{id}",
            axum::routing::patch(tv::update_mapping).delete(tv::delete_mapping),
        )
        .route("/api/tv/refresh", post(tv::refresh))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
