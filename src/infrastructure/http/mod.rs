//! HTTP REST API routes

mod intake_routes;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/intake/sessions", post(intake_routes::start_session))
        .route("/api/intake/sessions/{id}", get(intake_routes::get_session))
        .route(
            "/api/intake/sessions/{id}",
            delete(intake_routes::discard_session),
        )
        .route(
            "/api/intake/sessions/{id}/fields",
            put(intake_routes::update_field),
        )
        .route(
            "/api/intake/sessions/{id}/fields/toggle",
            post(intake_routes::toggle_field),
        )
        .route(
            "/api/intake/sessions/{id}/availability/preset",
            post(intake_routes::select_days),
        )
        .route(
            "/api/intake/sessions/{id}/photos",
            post(intake_routes::append_photos),
        )
        .route(
            "/api/intake/sessions/{id}/advance",
            post(intake_routes::advance),
        )
        .route(
            "/api/intake/sessions/{id}/retreat",
            post(intake_routes::retreat),
        )
        .route("/api/intake/sessions/{id}/submit", post(intake_routes::submit))
        .route(
            "/api/intake/sessions/{id}/location",
            post(intake_routes::capture_location),
        )
}
