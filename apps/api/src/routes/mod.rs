pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::jobs::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Section catalog
        .route("/api/v1/sections", get(handlers::handle_list_sections))
        // Report fill jobs
        .route("/api/v1/reports", post(handlers::handle_create_report))
        .route("/api/v1/reports/:id", get(handlers::handle_get_report))
        .route(
            "/api/v1/reports/:id/document",
            get(handlers::handle_download_document),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
