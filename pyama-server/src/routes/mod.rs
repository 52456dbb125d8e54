//! HTTP routes.

pub mod analysis;
pub mod images;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assembles the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/select_paths", post(images::select_paths))
        .route("/api/view", get(images::get_view))
        .route("/api/update_image", post(images::update_image))
        .route(
            "/api/update_particle_enabled",
            post(images::update_particle_enabled),
        )
        .route("/api/analysis", get(analysis::get_analysis))
        .route("/api/do_segmentation", post(analysis::do_segmentation))
        .route("/api/do_tracking", post(analysis::do_tracking))
        .route("/api/do_square_rois", post(analysis::do_square_rois))
        .route("/api/do_export", post(analysis::do_export))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "PyAMA scientific image processing API" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
