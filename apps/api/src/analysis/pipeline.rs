//! End-to-end analysis: extract → categorize → segment → gap → score.

use serde::{Deserialize, Serialize};

use crate::analysis::ats_score::{score, ScoreResult};
use crate::analysis::categorizer::{categorize, Categories};
use crate::analysis::gap::{analyze, explain, GapExplanations, GapResult};
use crate::analysis::segmenter::{segment, Segmentation};
use crate::analysis::similarity::similarity;
use crate::errors::AppError;
use crate::models::document::{require_text, DocumentKind};
use crate::optimizer::updater::{update_with_report, SectionChange};
use crate::text::extractor::{RankedTerm, TermExtractor};
use crate::text::normalizer::normalize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ats: ScoreResult,
    /// Cosine similarity of the two documents, 0–100.
    pub similarity: f64,
    pub resume_terms: Vec<RankedTerm>,
    pub jd_terms: Vec<RankedTerm>,
    pub jd_categories: Categories,
    pub gap: GapResult,
    pub explanations: GapExplanations,
    pub sections: Segmentation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeOutcome {
    pub updated_text: String,
    pub changes: Vec<SectionChange>,
    pub before: ScoreResult,
    pub after: ScoreResult,
}

/// Runs the full comparison of a résumé against a job description.
pub fn analyze_documents(
    resume: &str,
    jd: &str,
    extractor: &dyn TermExtractor,
    limit: usize,
) -> Result<AnalysisReport, AppError> {
    require_text(DocumentKind::Resume, resume)?;
    require_text(DocumentKind::JobDescription, jd)?;

    let resume_terms = extractor.extract(resume, limit);
    let jd_terms = extractor.extract(jd, limit);

    let resume_keys: Vec<&str> = resume_terms.iter().map(|r| r.term.as_str()).collect();
    let jd_keys: Vec<&str> = jd_terms.iter().map(|r| r.term.as_str()).collect();

    let gap = analyze(&resume_keys, &jd_keys);
    let explanations = explain(&gap);
    let ats = score(resume, Some(&jd_keys[..]))?;
    let similarity = similarity(&normalize(resume), &normalize(jd));

    tracing::info!(
        resume_terms = resume_terms.len(),
        jd_terms = jd_terms.len(),
        missing = gap.missing.len(),
        score = ats.total,
        "analysis complete"
    );

    Ok(AnalysisReport {
        ats,
        similarity,
        jd_categories: categorize(&jd_keys),
        resume_terms,
        jd_terms,
        gap,
        explanations,
        sections: segment(resume),
    })
}

/// Blends `terms_to_add` into the résumé and re-scores it.
pub fn optimize<S: AsRef<str>, J: AsRef<str>>(
    resume: &str,
    terms_to_add: &[S],
    jd_terms: Option<&[J]>,
) -> Result<OptimizeOutcome, AppError> {
    let before = score(resume, jd_terms)?;
    let report = update_with_report(resume, terms_to_add);
    let after = score(&report.updated_text, jd_terms)?;

    tracing::info!(
        before = before.total,
        after = after.total,
        sections_changed = report.changes.len(),
        "resume optimized"
    );

    Ok(OptimizeOutcome {
        updated_text: report.updated_text,
        changes: report.changes,
        before,
        after,
    })
}
