//! Resume Updater: inserts approved terms into Summary, Skills, and Experience.
//!
//! All offsets come from one fresh `segment` of the input text. Every change is
//! a `TextEdit` against that snapshot, applied in a single pass; text outside
//! the inserted spans is returned byte-for-byte.
//!
//! Routing (after `categorize`):
//! - Summary: one "Expertise includes …" sentence from the top 5 Technical/Tool
//!   terms, only if none of them is already in the summary. Never synthesized.
//! - Skills: Technical + Tool + Soft Skill terms not already in the section,
//!   one bullet each. Synthesized at the end of the document if absent.
//! - Experience: one bullet (Action Verb + up to 10 Technical/Tool terms) in the
//!   first entry. Synthesized at the end of the document if absent.
//!
//! A section is skipped when every term relevant to it already appears there
//! (case-insensitive), which makes `update` idempotent.

use serde::{Deserialize, Serialize};

use crate::analysis::categorizer::{categorize, Bucket};
use crate::analysis::segmenter::{entry_spans, segment, SectionLabel};
use crate::models::term::{contains_folded, dedup_terms};
use crate::optimizer::edits::{apply_edits, TextEdit};

pub const BULLET: &str = "- ";
const SUMMARY_TERM_LIMIT: usize = 5;
const EXPERIENCE_TERM_LIMIT: usize = 10;

/// What `update_with_report` changed in one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionChange {
    pub section: SectionLabel,
    /// The section did not exist and was appended to the document.
    pub synthesized: bool,
    pub added: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub updated_text: String,
    pub changes: Vec<SectionChange>,
}

/// Returns a new résumé with `terms_to_add` blended in. Total over all inputs.
pub fn update<S: AsRef<str>>(resume_text: &str, terms_to_add: &[S]) -> String {
    update_with_report(resume_text, terms_to_add).updated_text
}

pub fn update_with_report<S: AsRef<str>>(resume_text: &str, terms_to_add: &[S]) -> UpdateReport {
    let (edits, changes) = plan_edits(resume_text, terms_to_add);
    tracing::debug!(
        edits = edits.len(),
        sections = changes.len(),
        "applying resume edits"
    );
    UpdateReport {
        updated_text: apply_edits(resume_text, edits),
        changes,
    }
}

/// Line terminator used by the document.
fn newline_of(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Capitalizes the first character, leaving the rest untouched.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The sentence inserted into the first experience entry.
pub fn experience_bullet(verb: Option<&str>, tech: &[String]) -> Option<String> {
    let body = match (verb, tech.is_empty()) {
        (None, true) => return None,
        (Some(verb), true) => format!("{} projects", capitalize(verb)),
        (Some(verb), false) => format!("{} projects using {}", capitalize(verb), tech.join(", ")),
        (None, false) => format!("Utilized {}", tech.join(", ")),
    };
    Some(format!("{BULLET}{body} to achieve key business objectives."))
}

fn plan_edits<S: AsRef<str>>(text: &str, terms_to_add: &[S]) -> (Vec<TextEdit>, Vec<SectionChange>) {
    let mut edits = Vec::new();
    let mut changes = Vec::new();

    let terms = dedup_terms(terms_to_add);
    if terms.is_empty() {
        return (edits, changes);
    }

    let categories = categorize(&terms);
    let tech_and_tools: Vec<String> = categories
        .get(Bucket::Technical)
        .iter()
        .chain(categories.get(Bucket::ToolTechnology))
        .cloned()
        .collect();
    let skill_terms: Vec<String> = tech_and_tools
        .iter()
        .chain(categories.get(Bucket::SoftSkill))
        .cloned()
        .collect();
    let verb = categories.get(Bucket::ActionVerb).first().map(String::as_str);

    let segmentation = segment(text);
    let nl = newline_of(text);
    // Sections appended at the end, in this order.
    let mut appended: Vec<String> = Vec::new();

    // Summary
    if let Some(summary) = segmentation.get(SectionLabel::Summary) {
        let content = summary.content(text);
        let top: Vec<String> = tech_and_tools.iter().take(SUMMARY_TERM_LIMIT).cloned().collect();
        if !top.is_empty() && !top.iter().any(|t| contains_folded(content, t)) {
            let sentence = format!("Expertise includes {}.", top.join(", "));
            let insertion = if summary.span.is_empty() {
                format!("{nl}{sentence}")
            } else {
                format!(" {sentence}")
            };
            edits.push(TextEdit::insert(summary.span.end, insertion));
            changes.push(SectionChange {
                section: SectionLabel::Summary,
                synthesized: false,
                added: top,
            });
        }
    }

    // Skills
    match segmentation.get(SectionLabel::Skills) {
        Some(skills) => {
            let content = skills.content(text);
            let new_skills: Vec<String> = skill_terms
                .iter()
                .filter(|t| !contains_folded(content, t))
                .cloned()
                .collect();
            if !new_skills.is_empty() {
                let lines: String = new_skills
                    .iter()
                    .map(|t| format!("{nl}{BULLET}{t}"))
                    .collect();
                edits.push(TextEdit::insert(skills.span.end, lines));
                changes.push(SectionChange {
                    section: SectionLabel::Skills,
                    synthesized: false,
                    added: new_skills,
                });
            }
        }
        None if !skill_terms.is_empty() => {
            let bullets: Vec<String> = skill_terms.iter().map(|t| format!("{BULLET}{t}")).collect();
            appended.push(format!(
                "{}{nl}{}",
                SectionLabel::Skills.title(),
                bullets.join(nl)
            ));
            changes.push(SectionChange {
                section: SectionLabel::Skills,
                synthesized: true,
                added: skill_terms.clone(),
            });
        }
        None => {}
    }

    // Experience
    match segmentation.get(SectionLabel::Experience) {
        Some(experience) => {
            let content = experience.content(text);
            // Candidates are fixed before filtering so a second call sees the same set.
            let missing_tech: Vec<String> = tech_and_tools
                .iter()
                .take(EXPERIENCE_TERM_LIMIT)
                .filter(|t| !contains_folded(content, t))
                .cloned()
                .collect();
            let verb_missing = verb.is_some_and(|v| !contains_folded(content, v));

            if verb_missing || !missing_tech.is_empty() {
                if let Some(bullet) = experience_bullet(verb, &missing_tech) {
                    let at = entry_spans(text, experience)
                        .first()
                        .map(|entry| entry.end)
                        .unwrap_or(experience.span.end);
                    edits.push(TextEdit::insert(at, format!("{nl}{bullet}")));
                    changes.push(SectionChange {
                        section: SectionLabel::Experience,
                        synthesized: false,
                        added: verb.map(str::to_string).into_iter().chain(missing_tech).collect(),
                    });
                }
            }
        }
        None => {
            let tech: Vec<String> = tech_and_tools
                .iter()
                .take(EXPERIENCE_TERM_LIMIT)
                .cloned()
                .collect();
            if let Some(bullet) = experience_bullet(verb, &tech) {
                appended.push(format!("{}{nl}{bullet}", SectionLabel::Experience.title()));
                changes.push(SectionChange {
                    section: SectionLabel::Experience,
                    synthesized: true,
                    added: verb.map(str::to_string).into_iter().chain(tech).collect(),
                });
            }
        }
    }

    if !appended.is_empty() {
        let separator = if text.trim().is_empty() || text.ends_with(&format!("{nl}{nl}")) {
            String::new()
        } else if text.ends_with('\n') {
            nl.to_string()
        } else {
            format!("{nl}{nl}")
        };
        let block = appended.join(&format!("{nl}{nl}"));
        edits.push(TextEdit::insert(text.len(), format!("{separator}{block}")));
    }

    (edits, changes)
}
