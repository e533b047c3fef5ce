//! Term helpers. Terms compare case-insensitively but keep their display casing.

use std::collections::HashSet;

/// Comparison key: trimmed, lowercased, internal whitespace collapsed.
pub fn fold(term: &str) -> String {
    term.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drops blank terms and case-folded duplicates, keeping the first spelling seen.
pub fn dedup_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(fold(t)))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

/// Case-insensitive substring test.
pub fn contains_folded(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&fold(term))
}

/// Whole-word, case-insensitive containment. Whitespace runs in `haystack` count
/// as a single space, so multi-word terms match across line breaks.
pub fn contains_word(haystack: &str, term: &str) -> bool {
    let needle = fold(term);
    if needle.is_empty() {
        return false;
    }
    let hay = fold(haystack);
    hay.match_indices(&needle).any(|(at, _)| {
        let before = hay[..at].chars().next_back();
        let after = hay[at + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_normalizes_case_and_spacing() {
        assert_eq!(fold("  Machine   Learning "), "machine learning");
    }

    #[test]
    fn test_dedup_keeps_first_spelling() {
        let out = dedup_terms(&["AWS", "aws", " Python", "", "python "]);
        assert_eq!(out, vec!["AWS".to_string(), "Python".to_string()]);
    }

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("Skills: Python, Java.", "python"));
        assert!(!contains_word("Studied laws of motion", "aws"));
        assert!(contains_word("Built with C++ daily", "c++"));
        assert!(contains_word("machine\nlearning pipelines", "Machine Learning"));
        assert!(!contains_word("anything", "  "));
    }

    #[test]
    fn test_contains_folded() {
        assert!(contains_folded("Expertise includes Python.", "python"));
        assert!(!contains_folded("Expertise includes Python.", "rust"));
    }
}
