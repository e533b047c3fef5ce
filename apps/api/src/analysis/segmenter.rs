//! Section Segmenter: splits free-form résumé text into labelled, offset-bounded sections.
//!
//! Implemented as a line state machine rather than one large pattern:
//! - a header line opens a section (standalone `Skills`, `## Work Experience:`,
//!   or line-prefix `Experience: Managed a team`);
//! - content accumulates until the next header line, a blank-line pair
//!   (two or more consecutive blank lines), or end of document.
//!
//! Spans are half-open byte offsets into the original text, always on char
//! boundaries. `start` is the first content byte (or the end of the header line
//! when the section is empty); `end` is the end of the last non-blank content
//! line, so trailing blank lines sit outside the span. The Updater inserts at
//! these offsets directly.
//!
//! Name and Contact are heuristic, not header-anchored, and may be absent.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::lexicon::{self, Lexicon};

pub static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b")
        .expect("valid phone regex")
});

pub static PROFILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://)?(?:www\.)?(?:linkedin\.com/in|github\.com)/[A-Za-z0-9_-]+/?")
        .expect("valid profile regex")
});

/// Lines with more words than this are never taken as the candidate's name.
const MAX_NAME_WORDS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLabel {
    Name,
    Contact,
    Summary,
    Skills,
    Experience,
    Education,
}

impl SectionLabel {
    /// Display form used for synthesized headers and feedback.
    pub fn title(self) -> &'static str {
        match self {
            SectionLabel::Name => "Name",
            SectionLabel::Contact => "Contact",
            SectionLabel::Summary => "Summary",
            SectionLabel::Skills => "Skills",
            SectionLabel::Experience => "Experience",
            SectionLabel::Education => "Education",
        }
    }
}

/// Half-open byte range into the owning document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub label: SectionLabel,
    pub span: Span,
    pub lines: Vec<String>,
}

impl Section {
    /// The raw text covered by `span`.
    pub fn content<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.span.start..self.span.end).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile: Option<String>,
}

/// Result of `segment`: labelled sections plus the contact fields found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    pub sections: BTreeMap<SectionLabel, Section>,
    pub contact: ContactInfo,
}

impl Segmentation {
    pub fn get(&self, label: SectionLabel) -> Option<&Section> {
        self.sections.get(&label)
    }

    pub fn has(&self, label: SectionLabel) -> bool {
        self.sections.contains_key(&label)
    }

    /// Presumed candidate name, or an empty string.
    pub fn name(&self) -> &str {
        self.get(SectionLabel::Name)
            .and_then(|s| s.lines.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Line scanning
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    text: &'a str,
    start: usize,
    /// End of the line body, excluding `\n` / `\r\n`.
    end: usize,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

fn split_lines(text: &str, base: usize) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut pos = base;
    for raw in text.split('\n') {
        let body = raw.strip_suffix('\r').unwrap_or(raw);
        lines.push(Line {
            text: body,
            start: pos,
            end: pos + body.len(),
        });
        pos += raw.len() + 1;
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HeaderKind {
    Label(SectionLabel),
    /// Recognized header that only ends the running section.
    Boundary,
}

#[derive(Debug, Clone, Copy)]
struct HeaderMatch {
    kind: HeaderKind,
    /// Byte offset within the line where same-line content begins (prefix form).
    inline_content: Option<usize>,
}

fn synonym_table(lex: &Lexicon) -> Vec<(HeaderKind, &str)> {
    let headers = &lex.section_headers;
    let mut table: Vec<(HeaderKind, &str)> = Vec::new();
    for (label, synonyms) in [
        (SectionLabel::Summary, &headers.summary),
        (SectionLabel::Skills, &headers.skills),
        (SectionLabel::Experience, &headers.experience),
        (SectionLabel::Education, &headers.education),
    ] {
        table.extend(synonyms.iter().map(|s| (HeaderKind::Label(label), s.as_str())));
    }
    table.extend(
        lex.boundary_headers
            .iter()
            .map(|s| (HeaderKind::Boundary, s.as_str())),
    );
    // Longest first so "work experience:" wins over "experience".
    table.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    table
}

fn match_header(line: &str, table: &[(HeaderKind, &str)]) -> Option<HeaderMatch> {
    let body_start = line.len()
        - line
            .trim_start_matches(|c: char| c.is_whitespace() || c == '#' || c == '*')
            .len();
    let body = &line[body_start..];

    let standalone = body
        .trim_end()
        .trim_end_matches('*')
        .trim_end_matches(':')
        .trim_end_matches('*')
        .trim_end();
    if let Some((kind, _)) = table
        .iter()
        .find(|(_, syn)| standalone.eq_ignore_ascii_case(syn))
    {
        return Some(HeaderMatch {
            kind: *kind,
            inline_content: None,
        });
    }

    for (kind, syn) in table {
        let Some(head) = body.get(..syn.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(syn) {
            continue;
        }
        let rest = &body[syn.len()..];
        let after_spaces = rest.trim_start_matches([' ', '\t']);
        if let Some(after_colon) = after_spaces.strip_prefix(':') {
            let content = after_colon.trim_start_matches([' ', '\t']);
            let offset = line.len() - content.len();
            return Some(HeaderMatch {
                kind: *kind,
                inline_content: Some(offset),
            });
        }
    }

    None
}

/// Section being accumulated by the state machine.
struct OpenSection {
    /// `None` for boundary headers and repeated labels.
    label: Option<SectionLabel>,
    header_end: usize,
    first_content: Option<usize>,
    last_content_end: Option<usize>,
    blank_run: usize,
}

impl OpenSection {
    fn push_content(&mut self, start: usize, end: usize) {
        self.first_content.get_or_insert(start);
        self.last_content_end = Some(end);
        self.blank_run = 0;
    }

    fn close(self, text: &str) -> Option<Section> {
        let label = self.label?;
        let start = self.first_content.unwrap_or(self.header_end);
        let end = self.last_content_end.unwrap_or(start);
        let lines = text
            .get(start..end)
            .unwrap_or("")
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .filter(|_| end > start)
            .collect();
        Some(Section {
            label,
            span: Span { start, end },
            lines,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

/// Segments `text` into header-anchored sections plus heuristic Name / Contact.
///
/// Never fails; labels without a recognizable header are simply absent.
pub fn segment(text: &str) -> Segmentation {
    let lex = lexicon::get();
    let table = synonym_table(lex);
    let lines = split_lines(text, 0);

    let mut sections: BTreeMap<SectionLabel, Section> = BTreeMap::new();
    let mut open: Option<OpenSection> = None;
    let mut first_header_line: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        if let Some(header) = match_header(line.text, &table) {
            finish(open.take(), text, &mut sections);
            if first_header_line.is_none() {
                first_header_line = Some(idx);
            }

            let label = match header.kind {
                HeaderKind::Label(label) if !sections.contains_key(&label) => Some(label),
                _ => None,
            };
            let mut section = OpenSection {
                label,
                header_end: line.end,
                first_content: None,
                last_content_end: None,
                blank_run: 0,
            };
            if let Some(offset) = header.inline_content {
                if !line.text[offset..].trim().is_empty() {
                    section.push_content(line.start + offset, line.end);
                }
            }
            open = Some(section);
            continue;
        }

        let Some(section) = open.as_mut() else {
            continue;
        };
        if line.is_blank() {
            section.blank_run += 1;
            if section.blank_run >= 2 {
                finish(open.take(), text, &mut sections);
            }
        } else {
            section.push_content(line.start, line.end);
        }
    }
    finish(open.take(), text, &mut sections);

    let preamble_end = first_header_line.unwrap_or(lines.len());
    if let Some(name) = find_name(&lines[..preamble_end]) {
        sections.insert(SectionLabel::Name, name);
    }

    let (contact, contact_section) = find_contact(text, &lines);
    if let Some(section) = contact_section {
        sections.insert(SectionLabel::Contact, section);
    }

    tracing::debug!(
        found = ?sections.keys().collect::<Vec<_>>(),
        "segmented resume"
    );

    Segmentation { sections, contact }
}

fn finish(open: Option<OpenSection>, text: &str, sections: &mut BTreeMap<SectionLabel, Section>) {
    if let Some(section) = open.and_then(|o| o.close(text)) {
        sections.insert(section.label, section);
    }
}

/// First non-empty line with at most `MAX_NAME_WORDS` words that carries no contact detail.
fn find_name(preamble: &[Line<'_>]) -> Option<Section> {
    let line = preamble.iter().find(|l| {
        let words = l.text.split_whitespace().count();
        words > 0
            && words <= MAX_NAME_WORDS
            && !EMAIL_RE.is_match(l.text)
            && !PHONE_RE.is_match(l.text)
            && !PROFILE_RE.is_match(l.text)
    })?;

    let leading = line.text.len() - line.text.trim_start().len();
    let trimmed = line.text.trim();
    let start = line.start + leading;
    Some(Section {
        label: SectionLabel::Name,
        span: Span {
            start,
            end: start + trimmed.len(),
        },
        lines: vec![trimmed.to_string()],
    })
}

/// First email, phone, and profile link anywhere in the document.
fn find_contact(text: &str, lines: &[Line<'_>]) -> (ContactInfo, Option<Section>) {
    let email = EMAIL_RE.find(text);
    let phone = PHONE_RE.find(text);
    let profile = PROFILE_RE.find(text);

    let contact = ContactInfo {
        email: email.map(|m| m.as_str().to_string()),
        phone: phone.map(|m| m.as_str().trim().to_string()),
        profile: profile.map(|m| m.as_str().to_string()),
    };

    let mut carrying: Vec<usize> = [email, phone, profile]
        .into_iter()
        .flatten()
        .filter_map(|m| {
            lines
                .iter()
                .position(|l| m.start() >= l.start && m.start() <= l.end)
        })
        .collect();
    carrying.sort_unstable();
    carrying.dedup();

    // The section is the run of adjacent contact lines starting at the first
    // one, so its span covers exactly its lines. Stray fields further down
    // still land in `ContactInfo`.
    let section = carrying.first().map(|&first| {
        let run: Vec<&Line<'_>> = carrying
            .iter()
            .enumerate()
            .take_while(|&(offset, &idx)| idx == first + offset)
            .map(|(_, &idx)| &lines[idx])
            .collect();
        let start = run[0].start;
        let end = run[run.len() - 1].end;
        Section {
            label: SectionLabel::Contact,
            span: Span { start, end },
            lines: run.iter().map(|l| l.text.to_string()).collect(),
        }
    });

    (contact, section)
}

/// Spans of the entries (blank-line separated blocks) inside `section`.
pub fn entry_spans(text: &str, section: &Section) -> Vec<Span> {
    let Some(body) = text.get(section.span.start..section.span.end) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut current: Option<Span> = None;
    for line in split_lines(body, section.span.start) {
        if line.is_blank() {
            if let Some(span) = current.take() {
                entries.push(span);
            }
        } else {
            match current.as_mut() {
                Some(span) => span.end = line.end,
                None => {
                    current = Some(Span {
                        start: line.start,
                        end: line.end,
                    })
                }
            }
        }
    }
    if let Some(span) = current {
        entries.push(span);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESUME: &str = "Jane Roe\n\
jane.roe@example.com | (555) 123-4567 | linkedin.com/in/janeroe\n\
\n\
Summary\n\
Backend engineer focused on payments.\n\
Ships reliable systems.\n\
\n\
Skills\n\
- Rust\n\
- PostgreSQL\n\
\n\
Work Experience\n\
Acme Corp, Senior Engineer\n\
- Led migration to Rust\n\
\n\
Globex, Engineer\n\
- Built billing APIs\n\
\n\
Education\n\
B.S. Computer Science\n";

    fn content(text: &str, seg: &Segmentation, label: SectionLabel) -> String {
        seg.get(label).unwrap().content(text).to_string()
    }

    #[test]
    fn test_finds_all_labelled_sections() {
        let seg = segment(FULL_RESUME);
        for label in [
            SectionLabel::Name,
            SectionLabel::Contact,
            SectionLabel::Summary,
            SectionLabel::Skills,
            SectionLabel::Experience,
            SectionLabel::Education,
        ] {
            assert!(seg.has(label), "missing {label:?}");
        }
    }

    #[test]
    fn test_section_content_excludes_header_and_trailing_blank() {
        let seg = segment(FULL_RESUME);
        assert_eq!(
            content(FULL_RESUME, &seg, SectionLabel::Summary),
            "Backend engineer focused on payments.\nShips reliable systems."
        );
        assert_eq!(content(FULL_RESUME, &seg, SectionLabel::Skills), "- Rust\n- PostgreSQL");
        assert_eq!(
            content(FULL_RESUME, &seg, SectionLabel::Education),
            "B.S. Computer Science"
        );
    }

    #[test]
    fn test_single_blank_line_stays_inside_section() {
        let seg = segment(FULL_RESUME);
        let exp = content(FULL_RESUME, &seg, SectionLabel::Experience);
        assert!(exp.starts_with("Acme Corp"));
        assert!(exp.ends_with("- Built billing APIs"));
        assert_eq!(seg.get(SectionLabel::Experience).unwrap().lines.len(), 5);
    }

    #[test]
    fn test_blank_line_pair_ends_section() {
        let text = "Skills\n- Go\n\n\nUnrelated trailing notes\n";
        let seg = segment(text);
        assert_eq!(content(text, &seg, SectionLabel::Skills), "- Go");
    }

    #[test]
    fn test_prefix_header_on_same_line() {
        let text = "John Doe\nEmail: john@example.com\nExperience: Managed a team of 5.\nSkills: Python, Java.";
        let seg = segment(text);
        assert_eq!(
            content(text, &seg, SectionLabel::Experience),
            "Managed a team of 5."
        );
        assert_eq!(content(text, &seg, SectionLabel::Skills), "Python, Java.");
        assert_eq!(seg.name(), "John Doe");
        assert_eq!(seg.contact.email.as_deref(), Some("john@example.com"));
    }

    #[test]
    fn test_header_at_eof_yields_empty_span() {
        let text = "Jane Roe\nSkills";
        let seg = segment(text);
        let skills = seg.get(SectionLabel::Skills).unwrap();
        assert_eq!(skills.span, Span { start: text.len(), end: text.len() });
        assert!(skills.lines.is_empty());
    }

    #[test]
    fn test_no_experience_header_means_absent() {
        let text = "Jane Roe\nSummary\nEngineer.\nSkills\n- Go\nEducation\nBSc";
        let seg = segment(text);
        assert!(!seg.has(SectionLabel::Experience));
        assert!(seg.has(SectionLabel::Education));
    }

    #[test]
    fn test_experienced_in_prose_is_not_a_header() {
        let text = "Summary\nExperienced developer.\n";
        let seg = segment(text);
        assert!(!seg.has(SectionLabel::Experience));
        assert_eq!(content(text, &seg, SectionLabel::Summary), "Experienced developer.");
    }

    #[test]
    fn test_case_and_markup_insensitive_headers() {
        let text = "## PROFESSIONAL EXPERIENCE\nAcme\n**Skills:**\n- Go\n";
        let seg = segment(text);
        assert_eq!(content(text, &seg, SectionLabel::Experience), "Acme");
        assert_eq!(content(text, &seg, SectionLabel::Skills), "- Go");
    }

    #[test]
    fn test_boundary_header_ends_section_without_label() {
        let text = "Skills\n- Go\nProjects\n- Side project\n";
        let seg = segment(text);
        assert_eq!(content(text, &seg, SectionLabel::Skills), "- Go");
        assert_eq!(seg.sections.len(), 1);
    }

    #[test]
    fn test_first_occurrence_of_label_wins() {
        let text = "Skills\n- Go\nEducation\nBSc\nSkills\n- Rust\n";
        let seg = segment(text);
        assert_eq!(content(text, &seg, SectionLabel::Skills), "- Go");
        assert_eq!(content(text, &seg, SectionLabel::Education), "BSc");
    }

    #[test]
    fn test_crlf_offsets_exclude_carriage_return() {
        let text = "Skills\r\n- Go\r\n- Rust\r\nEducation\r\nBSc";
        let seg = segment(text);
        assert_eq!(content(text, &seg, SectionLabel::Skills), "- Go\r\n- Rust");
        assert_eq!(
            seg.get(SectionLabel::Skills).unwrap().lines,
            vec!["- Go".to_string(), "- Rust".to_string()]
        );
    }

    #[test]
    fn test_spans_respect_multibyte_text() {
        let text = "José Núñez\nSummary\nIngeniero de señales — 10 años.\n";
        let seg = segment(text);
        let summary = seg.get(SectionLabel::Summary).unwrap();
        assert!(text.is_char_boundary(summary.span.start));
        assert!(text.is_char_boundary(summary.span.end));
        assert_eq!(summary.content(text), "Ingeniero de señales — 10 años.");
        assert_eq!(seg.name(), "José Núñez");
    }

    #[test]
    fn test_missing_name_and_contact_fall_back() {
        let text = "Summary\nA long first line that has far more than four words in it.";
        let seg = segment(text);
        assert_eq!(seg.name(), "");
        assert_eq!(seg.contact, ContactInfo::default());
        assert!(!seg.has(SectionLabel::Contact));
    }

    #[test]
    fn test_contact_fields_anywhere_in_document() {
        let seg = segment(FULL_RESUME);
        assert_eq!(seg.contact.email.as_deref(), Some("jane.roe@example.com"));
        assert_eq!(seg.contact.phone.as_deref(), Some("(555) 123-4567"));
        assert_eq!(seg.contact.profile.as_deref(), Some("linkedin.com/in/janeroe"));
        let contact = seg.get(SectionLabel::Contact).unwrap();
        assert_eq!(contact.lines.len(), 1);
    }

    #[test]
    fn test_contact_span_matches_its_lines() {
        let text = "Jane Roe\njane@example.com\n(555) 123-4567\n\nExperience\nAcme\nReach me at github.com/janeroe\n";
        let seg = segment(text);
        assert_eq!(seg.contact.profile.as_deref(), Some("github.com/janeroe"));
        let contact = seg.get(SectionLabel::Contact).unwrap();
        assert_eq!(contact.lines, vec!["jane@example.com", "(555) 123-4567"]);
        assert_eq!(contact.content(text), "jane@example.com\n(555) 123-4567");
    }

    #[test]
    fn test_entry_spans_split_on_blank_lines() {
        let seg = segment(FULL_RESUME);
        let exp = seg.get(SectionLabel::Experience).unwrap();
        let entries = entry_spans(FULL_RESUME, exp);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            &FULL_RESUME[entries[0].start..entries[0].end],
            "Acme Corp, Senior Engineer\n- Led migration to Rust"
        );
    }

    #[test]
    fn test_empty_and_garbage_input_never_panics() {
        for text in ["", "\n\n\n", "::::", "Skills:", "\u{0}\u{1}#*", "Experience:\n\n\n"] {
            let seg = segment(text);
            for section in seg.sections.values() {
                assert!(section.span.start <= section.span.end);
                assert!(section.span.end <= text.len());
            }
        }
    }
}
