//! Offset-based text surgery.
//!
//! Edits are computed against one immutable snapshot and applied in a single
//! left-to-right pass, so no edit ever sees offsets shifted by another.

use serde::{Deserialize, Serialize};

use crate::analysis::segmenter::Span;

/// Replace `span` of the snapshot with `replacement`. An empty span is an insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        TextEdit {
            span: Span { start: at, end: at },
            replacement: text.into(),
        }
    }
}

/// Applies `edits` to `snapshot`.
///
/// Edits are ordered by start offset; insertions at the same offset keep the
/// order they were given in. An edit that overlaps an earlier one, runs past the
/// end, or splits a character is dropped (and logged) rather than failing.
pub fn apply_edits(snapshot: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by_key(|e| e.span.start);

    let extra: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(snapshot.len() + extra);
    let mut cursor = 0usize;

    for edit in edits {
        let Span { start, end } = edit.span;
        let valid = start >= cursor
            && start <= end
            && end <= snapshot.len()
            && snapshot.is_char_boundary(start)
            && snapshot.is_char_boundary(end);
        if !valid {
            tracing::warn!(start, end, cursor, "dropping invalid or overlapping edit");
            continue;
        }
        out.push_str(&snapshot[cursor..start]);
        out.push_str(&edit.replacement);
        cursor = end;
    }

    out.push_str(&snapshot[cursor..]);
    out
}
