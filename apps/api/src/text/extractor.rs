//! Term Extractor: ranks 1–3 word spans of a normalized document.
//!
//! Default: `TfIdfExtractor`, TF-IDF fitted over a corpus of exactly one document.
//! With one document the smoothed idf is the constant `ln(2/2) + 1 = 1`, so the
//! ranking is term frequency with a small bias towards longer spans.
//!
//! `AppState` holds an `Arc<dyn TermExtractor>` so the ranking can be swapped
//! without touching handlers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::text::normalizer;

/// Longest span considered, in tokens.
pub const MAX_SPAN: usize = 3;

/// Added to the score per extra token in a span.
const LENGTH_BIAS: f64 = 0.1;

/// A ranked candidate term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub term: String,
    pub frequency: u32,
    /// L2-normalized tf-idf weight, in (0, 1].
    pub score: f64,
}

pub trait TermExtractor: Send + Sync {
    /// Ranks terms of raw `text`, best first, keeping at most `limit`.
    fn extract(&self, text: &str, limit: usize) -> Vec<RankedTerm>;

    /// Same ranking, terms only.
    fn extract_terms(&self, text: &str, limit: usize) -> Vec<String> {
        self.extract(text, limit).into_iter().map(|r| r.term).collect()
    }
}

pub struct TfIdfExtractor;

impl TermExtractor for TfIdfExtractor {
    fn extract(&self, text: &str, limit: usize) -> Vec<RankedTerm> {
        let tokens = normalizer::tokens(text);
        rank_spans(&tokens, limit)
    }
}

struct Candidate {
    first_seen: usize,
    frequency: u32,
    span_len: usize,
}

/// Counts every 1..=MAX_SPAN token window and ranks them.
fn rank_spans(tokens: &[String], limit: usize) -> Vec<RankedTerm> {
    let mut candidates: HashMap<String, Candidate> = HashMap::new();
    let mut order = 0usize;

    for start in 0..tokens.len() {
        for len in 1..=MAX_SPAN {
            if start + len > tokens.len() {
                break;
            }
            let span = tokens[start..start + len].join(" ");
            let entry = candidates.entry(span).or_insert_with(|| {
                order += 1;
                Candidate {
                    first_seen: order,
                    frequency: 0,
                    span_len: len,
                }
            });
            entry.frequency += 1;
        }
    }

    // Single-document smoothed idf: ln((1 + n) / (1 + df)) + 1 with n = df = 1.
    let idf = ((1.0_f64 + 1.0) / (1.0 + 1.0)).ln() + 1.0;

    let mut scored: Vec<(String, u32, f64, usize)> = candidates
        .into_iter()
        .map(|(term, c)| {
            let weight = c.frequency as f64 * idf * (1.0 + LENGTH_BIAS * (c.span_len - 1) as f64);
            (term, c.frequency, weight, c.first_seen)
        })
        .collect();

    let norm = scored.iter().map(|(_, _, w, _)| w * w).sum::<f64>().sqrt();

    scored.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.3.cmp(&b.3)));
    scored.truncate(limit);

    tracing::debug!(tokens = tokens.len(), kept = scored.len(), "ranked term spans");

    scored
        .into_iter()
        .map(|(term, frequency, weight, _)| RankedTerm {
            term,
            frequency,
            score: if norm > 0.0 { weight / norm } else { 0.0 },
        })
        .collect()
}
