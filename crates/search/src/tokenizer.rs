//! Word segmentation for search operations
//!
//! Pipeline: UAX#29 word boundaries → strip possessives → remove non-alpha
//!           → lowercase
//!
//! Stopword removal and stemming are language-dependent and live in the
//! [`Analyzer`](crate::analyzer::Analyzer).

use unicode_segmentation::UnicodeSegmentation;

/// Strip English possessive suffix (`'s` / `\u{2019}s`).
#[inline]
fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix("\u{2019}s"))
        .unwrap_or(word)
}

/// Lowercase a word and drop every non-alphanumeric character.
pub fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split text into normalized words.
///
/// Words that normalize to nothing (pure punctuation) are dropped; no length
/// or stopword filtering happens here.
///
/// # Example
///
/// ```
/// use docsearch_search::tokenizer::words;
///
/// assert_eq!(words("John's U.S.A. trip"), vec!["john", "usa", "trip"]);
/// ```
pub fn words(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(strip_possessive)
        .map(normalize)
        .filter(|w| !w.is_empty())
        .collect()
}
