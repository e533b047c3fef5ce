//! Gap Analyzer: case-folded set algebra between résumé and job-description terms.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::term::fold;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapResult {
    /// In the job description, not in the résumé. Sorted.
    pub missing: Vec<String>,
    /// In both. Sorted.
    pub matched: Vec<String>,
}

/// One advisory sentence per gap term, parallel to the `GapResult` lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapExplanations {
    pub missing: Vec<String>,
    pub matched: Vec<String>,
}

/// `missing = jd − resume`, `matched = jd ∩ resume`, compared case-folded.
///
/// Output uses the job description's spelling, ordered by folded key.
pub fn analyze<R: AsRef<str>, J: AsRef<str>>(resume_terms: &[R], jd_terms: &[J]) -> GapResult {
    let resume: HashSet<String> = resume_terms.iter().map(|t| fold(t.as_ref())).collect();

    // folded key → first JD spelling
    let mut jd: BTreeMap<String, String> = BTreeMap::new();
    for term in jd_terms {
        let key = fold(term.as_ref());
        if key.is_empty() {
            continue;
        }
        jd.entry(key).or_insert_with(|| term.as_ref().trim().to_string());
    }

    let mut gap = GapResult::default();
    for (key, display) in jd {
        if resume.contains(&key) {
            gap.matched.push(display);
        } else {
            gap.missing.push(display);
        }
    }

    tracing::debug!(
        missing = gap.missing.len(),
        matched = gap.matched.len(),
        "gap analysis complete"
    );
    gap
}

pub fn explain(gap: &GapResult) -> GapExplanations {
    GapExplanations {
        missing: gap
            .missing
            .iter()
            .map(|k| {
                format!(
                    "The job description mentions '{k}', which is not prominently featured in your resume. \
                     If you have this skill, consider adding it to your skills or experience sections."
                )
            })
            .collect(),
        matched: gap
            .matched
            .iter()
            .map(|k| format!("Your resume shows experience with '{k}', which is a great match for this role."))
            .collect(),
    }
}
