pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::matching::handlers as matching;
use crate::state::AppState;

/// Room for multipart boundaries and the `is_primary` field on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Matching
        .route(
            "/api/v1/candidates/:id/recommendations",
            get(matching::handle_recommendations),
        )
        .route("/api/v1/match/score", post(matching::handle_score))
        // Resumes
        .route(
            "/api/v1/candidates/:id/resumes",
            post(extraction::handle_upload),
        )
        .route("/api/v1/resumes/:id", get(extraction::handle_get_resume))
        .route(
            "/api/v1/resumes/:id/extract",
            post(extraction::handle_reextract),
        )
        .route("/api/v1/extract", post(extraction::handle_extract_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
