//! Axum route handlers for the Optimizer API.

use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::analysis::pipeline::{optimize, OptimizeOutcome};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub resume_text: String,
    /// Terms the user approved for insertion.
    pub terms_to_add: Vec<String>,
    /// JD terms for the keyword criterion of the before/after scores.
    pub jd_terms: Option<Vec<String>>,
}

/// POST /api/v1/optimize
///
/// Inserts the approved terms and returns the new text with before/after scores.
pub async fn handle_optimize(
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeOutcome>, AppError> {
    if request.terms_to_add.len() > 200 {
        return Err(AppError::Validation(
            "terms_to_add cannot exceed 200 entries".to_string(),
        ));
    }

    let outcome = optimize(
        &request.resume_text,
        &request.terms_to_add,
        request.jd_terms.as_deref(),
    )?;

    info!(
        requested = request.terms_to_add.len(),
        before = outcome.before.total,
        after = outcome.after.total,
        "optimize request served"
    );
    Ok(Json(outcome))
}
