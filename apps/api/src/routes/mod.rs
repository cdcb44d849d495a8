pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::report::handlers as report_handlers;
use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route("/api/v1/screenings", post(handlers::handle_screen_resumes))
        // Report API
        .route(
            "/api/v1/reports",
            post(report_handlers::handle_render_report),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
