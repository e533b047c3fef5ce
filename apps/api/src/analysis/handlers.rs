//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::ats_score::{score, ScoreResult};
use crate::analysis::categorizer::{categorize, Categories};
use crate::analysis::gap::{analyze, explain, GapExplanations, GapResult};
use crate::analysis::pipeline::{analyze_documents, AnalysisReport};
use crate::analysis::segmenter::{segment, Segmentation};
use crate::errors::AppError;
use crate::models::document::{require_text, Document, DocumentKind};
use crate::state::AppState;
use crate::text::extractor::RankedTerm;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub jd_text: String,
    /// Overrides the configured term limit.
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SectionsRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub resume_text: String,
    /// Either explicit JD terms or a JD text to extract them from.
    pub jd_terms: Option<Vec<String>>,
    pub jd_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GapRequest {
    pub resume_terms: Vec<String>,
    pub jd_terms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GapResponse {
    pub gap: GapResult,
    pub explanations: GapExplanations,
}

#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    pub terms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    pub categories: Categories,
}

#[derive(Debug, Deserialize)]
pub struct TermsQuery {
    /// `resume` or `job_description` (default); only affects error messages.
    pub kind: Option<DocumentKind>,
}

#[derive(Debug, Serialize)]
pub struct TermsResponse {
    pub terms: Vec<RankedTerm>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Full comparison: ranked terms, categories, gap, explanations, ATS score,
/// similarity and the résumé's sections.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let limit = request.limit.unwrap_or(state.config.term_limit);
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let report = analyze_documents(
        &request.resume_text,
        &request.jd_text,
        state.extractor.as_ref(),
        limit,
    )?;

    info!(
        score = report.ats.total,
        similarity = report.similarity,
        "analyze request served"
    );
    Ok(Json(report))
}

/// POST /api/v1/sections
pub async fn handle_sections(
    Json(request): Json<SectionsRequest>,
) -> Result<Json<Segmentation>, AppError> {
    require_text(DocumentKind::Resume, &request.resume_text)?;
    Ok(Json(segment(&request.resume_text)))
}

/// POST /api/v1/score
///
/// `jd_terms` wins over `jd_text` when both are given.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResult>, AppError> {
    let jd_terms = match (request.jd_terms, request.jd_text) {
        (Some(terms), _) => Some(terms),
        (None, Some(jd_text)) => {
            require_text(DocumentKind::JobDescription, &jd_text)?;
            Some(
                state
                    .extractor
                    .extract_terms(&jd_text, state.config.term_limit),
            )
        }
        (None, None) => None,
    };

    let result = score(&request.resume_text, jd_terms.as_deref())?;
    info!(score = result.total, "score request served");
    Ok(Json(result))
}

/// POST /api/v1/gap
pub async fn handle_gap(Json(request): Json<GapRequest>) -> Result<Json<GapResponse>, AppError> {
    let gap = analyze(&request.resume_terms, &request.jd_terms);
    let explanations = explain(&gap);
    Ok(Json(GapResponse { gap, explanations }))
}

/// POST /api/v1/categorize
pub async fn handle_categorize(
    Json(request): Json<CategorizeRequest>,
) -> Result<Json<CategorizeResponse>, AppError> {
    Ok(Json(CategorizeResponse {
        categories: categorize(&request.terms),
    }))
}

/// POST /api/v1/terms
///
/// Takes the raw document as the body (text/plain or text/markdown) and
/// returns its ranked terms. `?kind=resume` names the document in errors.
pub async fn handle_terms(
    State(state): State<AppState>,
    Query(query): Query<TermsQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TermsResponse>, AppError> {
    let media_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let kind = query.kind.unwrap_or(DocumentKind::JobDescription);
    let document = Document::from_bytes(kind, &body, media_type)?;

    let terms = state
        .extractor
        .extract(&document.text, state.config.term_limit);
    info!(
        words = document.word_count(),
        terms = terms.len(),
        "terms request served"
    );
    Ok(Json(TermsResponse { terms }))
}
