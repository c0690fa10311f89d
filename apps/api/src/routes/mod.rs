pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment_handlers;
use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview pipeline
        .route(
            "/api/v1/interviews",
            post(handlers::handle_schedule_interview).get(handlers::handle_list_interviews),
        )
        .route("/api/v1/interviews/:id", get(handlers::handle_get_interview))
        .route(
            "/api/v1/interviews/:id/complete",
            post(handlers::handle_complete_interview),
        )
        .route(
            "/api/v1/interviews/:id/analyze",
            post(handlers::handle_analyze_interview),
        )
        // Assessments
        .route(
            "/api/v1/assessments",
            post(assessment_handlers::handle_create_assessment),
        )
        .with_state(state)
}
