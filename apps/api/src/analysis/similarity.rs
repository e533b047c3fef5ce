//! Document similarity: cosine of unigram TF-IDF vectors fitted over the résumé
//! and the job description (N = 2, smoothed idf, L2 normalized), scaled to 0–100.

use std::collections::{BTreeMap, HashMap};

/// Similarity of two normalized (space-joined lemma) documents, 0.0 – 100.0.
pub fn similarity(resume_normalized: &str, jd_normalized: &str) -> f64 {
    let docs = [term_counts(resume_normalized), term_counts(jd_normalized)];
    if docs.iter().any(HashMap::is_empty) {
        return 0.0;
    }

    // document frequency over the two-document corpus
    let mut df: BTreeMap<&str, u32> = BTreeMap::new();
    for doc in &docs {
        for term in doc.keys() {
            *df.entry(term.as_str()).or_default() += 1;
        }
    }

    let n = docs.len() as f64;
    let vectors: Vec<HashMap<&str, f64>> = docs
        .iter()
        .map(|doc| {
            let mut v: HashMap<&str, f64> = doc
                .iter()
                .map(|(term, &tf)| {
                    let idf = ((1.0 + n) / (1.0 + df[term.as_str()] as f64)).ln() + 1.0;
                    (term.as_str(), tf as f64 * idf)
                })
                .collect();
            let norm = v.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                v.values_mut().for_each(|w| *w /= norm);
            }
            v
        })
        .collect();

    let dot: f64 = vectors[0]
        .iter()
        .filter_map(|(term, w)| vectors[1].get(term).map(|o| w * o))
        .sum();

    (dot * 100.0).clamp(0.0, 100.0)
}

fn term_counts(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in text.split_whitespace() {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_documents_score_100() {
        let s = similarity("rust python aws", "rust python aws");
        assert!((s - 100.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn test_disjoint_documents_score_0() {
        assert_eq!(similarity("rust python", "sales marketing"), 0.0);
    }

    #[test]
    fn test_partial_overlap_between_bounds() {
        let s = similarity("rust python aws", "rust kubernetes terraform");
        assert!(s > 0.0 && s < 100.0, "got {s}");
    }

    #[test]
    fn test_empty_document_scores_0() {
        assert_eq!(similarity("", "rust"), 0.0);
        assert_eq!(similarity("rust", "   "), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = similarity("rust rust go", "go kafka");
        let b = similarity("go kafka", "rust rust go");
        assert!((a - b).abs() < 1e-9);
    }
}
