//! Lexicon: the versioned word tables every text component reads from.
//!
//! The tables ship embedded (`data/lexicon.json`) and can be replaced at startup
//! with a file of the same shape. Setup is a one-time, process-wide step:
//! `init` is called from `main` before the router is built; `get` falls back to
//! the embedded tables if nothing was initialised (tests, tooling).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

const EMBEDDED_LEXICON: &str = include_str!("../../data/lexicon.json");

static LEXICON: OnceCell<Lexicon> = OnceCell::new();

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed lexicon: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("lexicon table '{0}' is empty")]
    EmptyTable(&'static str),
}

/// Header synonyms per labelled résumé section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionHeaders {
    pub summary: Vec<String>,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
}

/// On-disk shape of the tables.
#[derive(Debug, Deserialize)]
struct RawLexicon {
    version: String,
    action_verbs: Vec<String>,
    soft_skills: Vec<String>,
    tools: Vec<String>,
    non_verb_ed: Vec<String>,
    stop_words: Vec<String>,
    irregular_lemmas: HashMap<String, String>,
    lemma_exceptions: Vec<String>,
    section_headers: SectionHeaders,
    boundary_headers: Vec<String>,
}

/// Lowercased, set-backed view of the tables.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub version: String,
    /// Kept in file order; the scorer reports verbs in this order.
    pub action_verbs: Vec<String>,
    action_verb_set: HashSet<String>,
    soft_skills: HashSet<String>,
    tools: HashSet<String>,
    non_verb_ed: HashSet<String>,
    stop_words: HashSet<String>,
    irregular_lemmas: HashMap<String, String>,
    lemma_exceptions: HashSet<String>,
    pub section_headers: SectionHeaders,
    pub boundary_headers: Vec<String>,
}

fn lowered_set(words: &[String]) -> HashSet<String> {
    words.iter().map(|w| w.trim().to_lowercase()).collect()
}

fn lowered_vec(words: Vec<String>) -> Vec<String> {
    words.into_iter().map(|w| w.trim().to_lowercase()).collect()
}

impl Lexicon {
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let raw: RawLexicon = serde_json::from_str(json)?;

        if raw.action_verbs.is_empty() {
            return Err(LexiconError::EmptyTable("action_verbs"));
        }
        if raw.soft_skills.is_empty() {
            return Err(LexiconError::EmptyTable("soft_skills"));
        }
        if raw.tools.is_empty() {
            return Err(LexiconError::EmptyTable("tools"));
        }
        if raw.stop_words.is_empty() {
            return Err(LexiconError::EmptyTable("stop_words"));
        }

        let headers = raw.section_headers;
        Ok(Lexicon {
            version: raw.version,
            action_verb_set: lowered_set(&raw.action_verbs),
            action_verbs: lowered_vec(raw.action_verbs),
            soft_skills: lowered_set(&raw.soft_skills),
            tools: lowered_set(&raw.tools),
            non_verb_ed: lowered_set(&raw.non_verb_ed),
            stop_words: lowered_set(&raw.stop_words),
            irregular_lemmas: raw
                .irregular_lemmas
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
                .collect(),
            lemma_exceptions: lowered_set(&raw.lemma_exceptions),
            section_headers: SectionHeaders {
                summary: lowered_vec(headers.summary),
                skills: lowered_vec(headers.skills),
                experience: lowered_vec(headers.experience),
                education: lowered_vec(headers.education),
            },
            boundary_headers: lowered_vec(raw.boundary_headers),
        })
    }

    pub fn embedded() -> Result<Self, LexiconError> {
        Self::from_json(EMBEDDED_LEXICON)
    }

    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn is_action_verb(&self, word: &str) -> bool {
        self.action_verb_set.contains(word)
    }

    pub fn is_soft_skill(&self, term: &str) -> bool {
        self.soft_skills.contains(term)
    }

    pub fn is_tool(&self, term: &str) -> bool {
        self.tools.contains(term)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn is_non_verb_ed(&self, word: &str) -> bool {
        self.non_verb_ed.contains(word)
    }

    pub fn irregular_lemma(&self, word: &str) -> Option<&str> {
        self.irregular_lemmas.get(word).map(String::as_str)
    }

    pub fn is_lemma_exception(&self, word: &str) -> bool {
        self.lemma_exceptions.contains(word)
    }
}

/// One-time setup. Loads `path` if given, otherwise the embedded tables.
///
/// Idempotent: a second call returns the tables already installed.
pub fn init(path: Option<&Path>) -> Result<&'static Lexicon, LexiconError> {
    if let Some(existing) = LEXICON.get() {
        tracing::warn!(version = %existing.version, "lexicon already initialised, keeping it");
        return Ok(existing);
    }

    let lexicon = match path {
        Some(p) => Lexicon::from_path(p)?,
        None => Lexicon::embedded()?,
    };
    let lexicon = LEXICON.get_or_init(|| lexicon);
    tracing::info!(
        version = %lexicon.version,
        action_verbs = lexicon.action_verbs.len(),
        source = path.map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "lexicon loaded"
    );
    Ok(lexicon)
}

/// Returns the installed tables, installing the embedded ones on first use.
pub fn get() -> &'static Lexicon {
    LEXICON.get_or_init(|| {
        // The embedded file is covered by `test_embedded_lexicon_parses`.
        Lexicon::embedded().unwrap_or_else(|e| panic!("embedded lexicon is invalid: {e}"))
    })
}
