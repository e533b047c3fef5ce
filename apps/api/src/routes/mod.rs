pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::optimizer::handlers as optimizer;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/sections", post(analysis::handle_sections))
        .route("/api/v1/score", post(analysis::handle_score))
        .route("/api/v1/gap", post(analysis::handle_gap))
        .route("/api/v1/categorize", post(analysis::handle_categorize))
        .route("/api/v1/terms", post(analysis::handle_terms))
        // Optimizer API
        .route("/api/v1/optimize", post(optimizer::handle_optimize))
        .with_state(state)
}
