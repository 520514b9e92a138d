pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::jobs::handlers::handle_submit_job;
use crate::state::AppState;

/// Resume uploads may exceed Axum's 2 MiB default body limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/job", post(handle_submit_job))
        .route(
            "/api/analyze",
            post(handle_analyze).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}
