//! ATS Scorer: fixed, additive rubric over raw résumé text.
//!
//! | criterion                | points            |
//! |--------------------------|-------------------|
//! | contact                  | 20 (email, phone) |
//! | sections                 | 20 (5 per section)|
//! | action verbs             | 15                |
//! | quantified achievements  | 15                |
//! | keyword match            | 30, JD required   |
//! | length                   | −5 outside band   |
//!
//! `total = clamp(sum, 0, 100)`. Feedback follows criterion order. Each criterion
//! is its own function so it can be checked in isolation.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::segmenter::{segment, SectionLabel, EMAIL_RE, PHONE_RE};
use crate::errors::AppError;
use crate::models::document::{require_text, DocumentKind};
use crate::models::term::{contains_word, dedup_terms};
use crate::text::lexicon;

pub const MIN_WORDS: usize = 200;
pub const MAX_WORDS: usize = 1500;
const LENGTH_PENALTY: i32 = -5;

const KEYWORD_POINTS: f64 = 30.0;
const LOW_BAND_BELOW: f64 = 40.0;
const EXCELLENT_BAND_ABOVE: f64 = 70.0;

/// Sections checked for presence, 5 points each.
const SCORED_SECTIONS: [SectionLabel; 4] = [
    SectionLabel::Summary,
    SectionLabel::Skills,
    SectionLabel::Experience,
    SectionLabel::Education,
];

static QUANTIFIED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+(?:\.\d+)?\s?%|[$€£]\s?\d[\d,]*(?:\.\d+)?|\b\d+(?:\.\d+)?\s?(?:million|billion|thousand)\b|\b\d+(?:\.\d+)?x\b|\b\d{3,}\b",
    )
    .expect("valid quantified-achievement regex")
});

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Contact,
    Sections,
    ActionVerbs,
    QuantifiedAchievements,
    KeywordMatch,
    Length,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub points: i32,
    pub feedback: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0 – 100
    pub total: u32,
    pub feedback: Vec<String>,
    pub breakdown: Vec<CriterionScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordBand {
    Low,
    Moderate,
    Excellent,
}

impl KeywordBand {
    /// Fixed breakpoints: <40 low, 40–70 moderate, >70 excellent.
    pub fn for_percent(pct: f64) -> Self {
        if pct < LOW_BAND_BELOW {
            KeywordBand::Low
        } else if pct <= EXCELLENT_BAND_ABOVE {
            KeywordBand::Moderate
        } else {
            KeywordBand::Excellent
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            KeywordBand::Low => "low",
            KeywordBand::Moderate => "moderate",
            KeywordBand::Excellent => "excellent",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Scores `resume_text`. `jd_terms` of `None` (or an empty list) scores the
/// keyword criterion at 0 with an advisory message.
pub fn score<S: AsRef<str>>(
    resume_text: &str,
    jd_terms: Option<&[S]>,
) -> Result<ScoreResult, AppError> {
    require_text(DocumentKind::Resume, resume_text)?;

    let breakdown = vec![
        check_contact(resume_text),
        check_sections(resume_text),
        check_action_verbs(resume_text),
        check_quantified_achievements(resume_text),
        check_keyword_match(resume_text, jd_terms),
        check_length(resume_text),
    ];

    let sum: i32 = breakdown.iter().map(|c| c.points).sum();
    let total = sum.clamp(0, 100) as u32;
    let feedback = breakdown
        .iter()
        .flat_map(|c| c.feedback.iter().cloned())
        .collect();

    tracing::debug!(total, raw_sum = sum, "ats score computed");

    Ok(ScoreResult {
        total,
        feedback,
        breakdown,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Criteria
// ────────────────────────────────────────────────────────────────────────────

pub fn check_contact(text: &str) -> CriterionScore {
    let mut points = 0;
    let mut feedback = Vec::new();

    if EMAIL_RE.is_match(text) {
        points += 10;
    } else {
        feedback.push("Missing email address.".to_string());
    }
    if PHONE_RE.is_match(text) {
        points += 10;
    } else {
        feedback.push("Missing phone number.".to_string());
    }

    CriterionScore {
        criterion: Criterion::Contact,
        points,
        feedback,
    }
}

pub fn check_sections(text: &str) -> CriterionScore {
    let segmentation = segment(text);
    let mut points = 0;
    let mut feedback = Vec::new();

    for label in SCORED_SECTIONS {
        if segmentation.has(label) {
            points += 5;
        } else {
            feedback.push(format!("Missing '{}' section.", label.title()));
        }
    }

    CriterionScore {
        criterion: Criterion::Sections,
        points,
        feedback,
    }
}

/// Distinct lexicon action verbs present as whole words, in lexicon order.
pub fn action_verbs_found(text: &str) -> Vec<String> {
    let words: HashSet<String> = text
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    lexicon::get()
        .action_verbs
        .iter()
        .filter(|v| words.contains(v.as_str()))
        .cloned()
        .collect()
}

pub fn check_action_verbs(text: &str) -> CriterionScore {
    let found = action_verbs_found(text).len();
    let (points, feedback) = match found {
        0 => (
            0,
            vec!["Include more action verbs to describe your accomplishments.".to_string()],
        ),
        1 | 2 => (
            8,
            vec![format!(
                "Use more action verbs (found {found}; aim for at least 3)."
            )],
        ),
        _ => (15, vec![]),
    };

    CriterionScore {
        criterion: Criterion::ActionVerbs,
        points,
        feedback,
    }
}

/// Metric-like figures in `text`. Digits inside a phone number or email
/// address and bare years (19xx / 20xx) are not achievements.
pub fn quantified_matches(text: &str) -> Vec<&str> {
    let contact: Vec<std::ops::Range<usize>> = PHONE_RE
        .find_iter(text)
        .chain(EMAIL_RE.find_iter(text))
        .map(|m| m.range())
        .collect();

    QUANTIFIED_RE
        .find_iter(text)
        .filter(|m| !contact.iter().any(|r| m.start() < r.end && r.start < m.end()))
        .map(|m| m.as_str())
        .filter(|figure| !is_bare_year(figure))
        .collect()
}

fn is_bare_year(figure: &str) -> bool {
    figure.len() == 4
        && figure.bytes().all(|b| b.is_ascii_digit())
        && (figure.starts_with("19") || figure.starts_with("20"))
}

pub fn check_quantified_achievements(text: &str) -> CriterionScore {
    let found = quantified_matches(text).len();
    let (points, feedback) = match found {
        0 => (
            0,
            vec![
                "Add quantifiable achievements to demonstrate your impact (e.g., 'Increased sales by 20%')."
                    .to_string(),
            ],
        ),
        1 | 2 => (
            8,
            vec![format!(
                "Add more quantified achievements (found {found}; aim for at least 3)."
            )],
        ),
        _ => (15, vec![]),
    };

    CriterionScore {
        criterion: Criterion::QuantifiedAchievements,
        points,
        feedback,
    }
}

/// Share of distinct JD terms found in `text` as whole words, 0 – 100.
/// `None` when there are no JD terms to compare against.
pub fn keyword_match_percent<S: AsRef<str>>(text: &str, jd_terms: &[S]) -> Option<f64> {
    let terms = dedup_terms(jd_terms);
    if terms.is_empty() {
        return None;
    }
    let matched = terms.iter().filter(|t| contains_word(text, t)).count();
    Some(matched as f64 / terms.len() as f64 * 100.0)
}

pub fn check_keyword_match<S: AsRef<str>>(text: &str, jd_terms: Option<&[S]>) -> CriterionScore {
    let Some(pct) = jd_terms.and_then(|terms| keyword_match_percent(text, terms)) else {
        return CriterionScore {
            criterion: Criterion::KeywordMatch,
            points: 0,
            feedback: vec!["Provide a job description to evaluate keyword match.".to_string()],
        };
    };

    let band = KeywordBand::for_percent(pct);
    let advice = match band {
        KeywordBand::Low => " Add more of the job description's key terms to your resume.",
        KeywordBand::Moderate => " Consider adding the missing key terms.",
        KeywordBand::Excellent => "",
    };

    CriterionScore {
        criterion: Criterion::KeywordMatch,
        points: (pct / 100.0 * KEYWORD_POINTS).round() as i32,
        feedback: vec![format!(
            "Keyword match is {} ({pct:.1}%).{advice}",
            band.as_str()
        )],
    }
}

pub fn check_length(text: &str) -> CriterionScore {
    let words = text.split_whitespace().count();
    let (points, feedback) = if words < MIN_WORDS {
        (
            LENGTH_PENALTY,
            vec![format!(
                "Resume is short ({words} words); aim for {MIN_WORDS}-{MAX_WORDS} words."
            )],
        )
    } else if words > MAX_WORDS {
        (
            LENGTH_PENALTY,
            vec![format!(
                "Resume is long ({words} words); aim for {MIN_WORDS}-{MAX_WORDS} words."
            )],
        )
    } else {
        (0, vec![])
    };

    CriterionScore {
        criterion: Criterion::Length,
        points,
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str =
        "John Doe\nEmail: john@example.com\nExperience: Managed a team of 5.\nSkills: Python, Java.";

    fn padded(body: &str, words: usize) -> String {
        let filler = vec!["lorem"; words].join(" ");
        format!("{body}\n{filler}")
    }

    #[test]
    fn test_scenario_keyword_feedback_is_low_33_3() {
        let jd = ["python", "leadership", "aws"];
        let result = score(SCENARIO, Some(&jd[..])).unwrap();
        let kw = result
            .feedback
            .iter()
            .find(|f| f.to_lowercase().contains("keyword match"))
            .unwrap();
        assert!(kw.contains("33.3%"), "{kw}");
        assert!(kw.contains("low"), "{kw}");
    }

    #[test]
    fn test_scenario_total() {
        // contact 10 + sections 10 + verbs 8 + quantified 0 + keywords 10 - length 5
        let jd = ["python", "leadership", "aws"];
        let result = score(SCENARIO, Some(&jd[..])).unwrap();
        assert_eq!(result.total, 33);
        assert_eq!(result.breakdown.len(), 6);
    }

    #[test]
    fn test_feedback_follows_rubric_order() {
        let result = score::<&str>(SCENARIO, None).unwrap();
        assert_eq!(
            result.feedback,
            vec![
                "Missing phone number.".to_string(),
                "Missing 'Summary' section.".to_string(),
                "Missing 'Education' section.".to_string(),
                "Use more action verbs (found 1; aim for at least 3).".to_string(),
                "Add quantifiable achievements to demonstrate your impact (e.g., 'Increased sales by 20%').".to_string(),
                "Provide a job description to evaluate keyword match.".to_string(),
                "Resume is short (13 words); aim for 200-1500 words.".to_string(),
            ]
        );
    }

    #[test]
    fn test_contact_points() {
        assert_eq!(check_contact("a@b.io (555) 123-4567").points, 20);
        assert_eq!(check_contact("a@b.io").points, 10);
        let none = check_contact("no contact here");
        assert_eq!(none.points, 0);
        assert_eq!(none.feedback.len(), 2);
    }

    #[test]
    fn test_sections_points() {
        let all = "Summary\nx\nSkills\nx\nExperience\nx\nEducation\nx";
        assert_eq!(check_sections(all).points, 20);
        let one = check_sections("Education\nBSc");
        assert_eq!(one.points, 5);
        assert_eq!(one.feedback.len(), 3);
    }

    #[test]
    fn test_action_verb_tiers() {
        assert_eq!(check_action_verbs("Nothing relevant").points, 0);
        assert_eq!(check_action_verbs("Managed things. Led people.").points, 8);
        assert_eq!(
            check_action_verbs("Managed, led, developed and reduced costs").points,
            15
        );
    }

    #[test]
    fn test_action_verbs_whole_words_only() {
        assert!(action_verbs_found("Misled by unmanaged sledding").is_empty());
    }

    #[test]
    fn test_quantified_tiers() {
        assert_eq!(check_quantified_achievements("No numbers here").points, 0);
        assert_eq!(check_quantified_achievements("Grew revenue 20%").points, 8);
        assert_eq!(
            check_quantified_achievements("Cut costs by $500, 30% faster, served 2 million users")
                .points,
            15
        );
    }

    #[test]
    fn test_phone_and_years_are_not_achievements() {
        let text = "Jane Roe\n(555) 123-4567\njane99@example.com\nExperience\nAcme Corp, 2019 - 2023\n- Wrote code\n";
        assert!(quantified_matches(text).is_empty());
        assert_eq!(check_quantified_achievements(text).points, 0);
    }

    #[test]
    fn test_large_figures_still_count() {
        assert_eq!(quantified_matches("Onboarded 1500 customers in 2021"), vec!["1500"]);
    }

    #[test]
    fn test_keyword_bands() {
        assert_eq!(KeywordBand::for_percent(39.9), KeywordBand::Low);
        assert_eq!(KeywordBand::for_percent(40.0), KeywordBand::Moderate);
        assert_eq!(KeywordBand::for_percent(70.0), KeywordBand::Moderate);
        assert_eq!(KeywordBand::for_percent(70.1), KeywordBand::Excellent);
    }

    #[test]
    fn test_keyword_points_scale_to_thirty() {
        let all = check_keyword_match("python aws", Some(&["python", "aws"][..]));
        assert_eq!(all.points, 30);
        assert!(all.feedback[0].contains("excellent (100.0%)"));
        let half = check_keyword_match("python", Some(&["python", "aws"][..]));
        assert_eq!(half.points, 15);
        assert!(half.feedback[0].contains("moderate (50.0%)"));
    }

    #[test]
    fn test_empty_jd_terms_treated_as_absent() {
        let c = check_keyword_match::<&str>("python", Some(&[][..]));
        assert_eq!(c.points, 0);
        assert!(c.feedback[0].contains("Provide a job description"));
    }

    #[test]
    fn test_length_band() {
        assert_eq!(check_length(&padded("x", 10)).points, -5);
        assert_eq!(check_length(&padded("x", 400)).points, 0);
        assert_eq!(check_length(&padded("x", 1600)).points, -5);
    }

    #[test]
    fn test_total_clamped_at_zero() {
        let result = score::<&str>("lorem ipsum", None).unwrap();
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_empty_resume_is_input_error() {
        assert!(matches!(
            score::<&str>("   ", None),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_jd_superset_never_lowers_score() {
        let resume = padded(
            "Jane Roe\njane@example.com 555-123-4567\nSummary\nEngineer.\nSkills\nRust, Go\n\
             Experience\nLed 3 teams, reduced cost 20%, managed $2000 budget\nEducation\nBSc",
            250,
        );
        let without = score::<&str>(&resume, None).unwrap().total;
        let with = score(&resume, Some(&["rust", "go", "kubernetes"][..])).unwrap().total;
        assert!(without <= with);
        assert!(with <= 100);
    }
}
