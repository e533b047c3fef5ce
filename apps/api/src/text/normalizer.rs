//! Text Normalizer: lowercase, letters only, stop-words removed, lemmatized.

use crate::text::lexicon;

/// Normalizes raw text into a single space-joined string of lemmas.
pub fn normalize(text: &str) -> String {
    tokens(text).join(" ")
}

/// Same pipeline as `normalize`, returning the token list.
pub fn tokens(text: &str) -> Vec<String> {
    let lex = lexicon::get();

    let letters_only: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();

    letters_only
        .split_whitespace()
        .filter(|w| !lex.is_stop_word(w))
        .map(lemmatize)
        .collect()
}

/// Noun-default lemmatization: irregular table, then plural suffix rules.
pub fn lemmatize(word: &str) -> String {
    let lex = lexicon::get();

    if let Some(lemma) = lex.irregular_lemma(word) {
        return lemma.to_string();
    }
    if word.len() <= 3 || lex.is_lemma_exception(word) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if word.len() > 4 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    for suffix in ["ches", "shes", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is"))
    {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_non_letters() {
        assert_eq!(normalize("Python 3.11, AWS!"), "python aws");
    }

    #[test]
    fn test_removes_stop_words() {
        assert_eq!(normalize("the team and the product"), "team product");
    }

    #[test]
    fn test_lemmatizes_plurals() {
        assert_eq!(lemmatize("skills"), "skill");
        assert_eq!(lemmatize("technologies"), "technology");
        assert_eq!(lemmatize("classes"), "class");
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("services"), "service");
    }

    #[test]
    fn test_lemma_keeps_singular_forms() {
        assert_eq!(lemmatize("process"), "process");
        assert_eq!(lemmatize("analysis"), "analysis");
        assert_eq!(lemmatize("status"), "status");
        assert_eq!(lemmatize("kubernetes"), "kubernetes");
    }

    #[test]
    fn test_irregular_lemmas() {
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("criteria"), "criterion");
    }

    #[test]
    fn test_short_words_untouched() {
        assert_eq!(lemmatize("aws"), "aws");
        assert_eq!(lemmatize("ios"), "ios");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert!(tokens("  \n\t ").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_dropped() {
        assert_eq!(normalize("Résumé écrit"), "rsum crit");
    }
}
