//! Term Categorizer: sorts a flat term list into the four keyword buckets.
//!
//! Each term lands in exactly one bucket:
//! 1. action-verb table, 2. soft-skill table, 3. tool table (explicit membership
//!    always wins), then
//! 4. grammatical fallback: a recognizable past-tense verb form → Action Verb,
//!    anything else (noun-like or unknown) → Technical.
//!
//! The Technical default is coarse: any domain term missing from the tables ends
//! up there.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::term::{dedup_terms, fold};
use crate::text::lexicon::{self, Lexicon};

/// Maximum terms kept per bucket after dedup.
pub const BUCKET_CAP: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "Technical")]
    Technical,
    #[serde(rename = "Tool/Technology")]
    ToolTechnology,
    #[serde(rename = "Soft Skill")]
    SoftSkill,
    #[serde(rename = "Action Verb")]
    ActionVerb,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Technical,
        Bucket::ToolTechnology,
        Bucket::SoftSkill,
        Bucket::ActionVerb,
    ];
}

/// Bucket → ordered, deduplicated terms. All four buckets are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories(BTreeMap<Bucket, Vec<String>>);

impl Categories {
    pub fn get(&self, bucket: Bucket) -> &[String] {
        self.0.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Bucket, &Vec<String>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classifies one term.
pub fn classify(term: &str) -> Bucket {
    let lex = lexicon::get();
    let key = fold(term);

    if lex.is_action_verb(&key) {
        Bucket::ActionVerb
    } else if lex.is_soft_skill(&key) {
        Bucket::SoftSkill
    } else if lex.is_tool(&key) {
        Bucket::ToolTechnology
    } else if is_verb_form(lex, &key) {
        Bucket::ActionVerb
    } else {
        Bucket::Technical
    }
}

/// Single-word regular past tense that is not a known adjective/noun in `-ed`.
fn is_verb_form(lex: &Lexicon, key: &str) -> bool {
    !key.contains(' ')
        && key.len() > 4
        && key.ends_with("ed")
        && key.chars().all(|c| c.is_ascii_alphabetic())
        && !lex.is_non_verb_ed(key)
}

/// Buckets `terms`, deduplicated case-insensitively, sorted, capped at `BUCKET_CAP`.
pub fn categorize<S: AsRef<str>>(terms: &[S]) -> Categories {
    let mut buckets: BTreeMap<Bucket, Vec<String>> =
        Bucket::ALL.iter().map(|b| (*b, Vec::new())).collect();

    for term in dedup_terms(terms) {
        buckets.entry(classify(&term)).or_default().push(term);
    }

    for terms in buckets.values_mut() {
        terms.sort_by(|a, b| fold(a).cmp(&fold(b)).then_with(|| a.cmp(b)));
        terms.truncate(BUCKET_CAP);
    }

    let categories = Categories(buckets);
    tracing::debug!(
        technical = categories.get(Bucket::Technical).len(),
        tools = categories.get(Bucket::ToolTechnology).len(),
        soft = categories.get(Bucket::SoftSkill).len(),
        verbs = categories.get(Bucket::ActionVerb).len(),
        "categorized terms"
    );
    categories
}
