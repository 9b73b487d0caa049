//! Text analysis pipeline
//!
//! Pipeline: words (UAX#29, possessives, alphanumerics, lowercase)
//!           → filter short tokens → remove stopwords → stem
//!
//! An analyzer starts in English mode. Locale extensions add languages: the
//! stopword set becomes the union of every language's stopwords and the
//! stemmers run in the order the languages were added. Documents and queries
//! must go through the same analyzer for matches to line up.

use crate::stemmer;
use crate::tokenizer::{normalize, words};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A stemming function
pub type Stemmer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Standard English stopwords (Lucene's default set).
///
/// These high-frequency words carry little discriminative value for BM25
/// and are filtered out during analysis.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Minimum token length in chars.
const MIN_TOKEN_LEN: usize = 2;

/// Language-aware text analyzer
#[derive(Clone)]
pub struct Analyzer {
    languages: Vec<String>,
    stopwords: HashSet<String>,
    stemmers: Vec<Stemmer>,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("languages", &self.languages)
            .field("stopwords", &self.stopwords.len())
            .field("stemmers", &self.stemmers.len())
            .finish()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::english()
    }
}

impl Analyzer {
    /// Analyzer with no language at all: segmentation and length filter only
    pub fn bare() -> Self {
        Analyzer {
            languages: Vec::new(),
            stopwords: HashSet::new(),
            stemmers: Vec::new(),
        }
    }

    /// Default single-language analyzer
    pub fn english() -> Self {
        let mut analyzer = Self::bare();
        analyzer.add_language("en", ENGLISH_STOPWORDS, Arc::new(stemmer::english));
        analyzer
    }

    /// Add a language's stopwords and stemmer.
    ///
    /// Adding a language code that is already present is a no-op.
    pub fn add_language(&mut self, code: &str, stopwords: &[&str], stemmer: Stemmer) {
        if self.has_language(code) {
            return;
        }
        self.languages.push(code.to_string());
        self.stopwords.extend(stopwords.iter().map(|s| s.to_string()));
        self.stemmers.push(stemmer);
    }

    /// Is the language already part of the pipeline?
    pub fn has_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l == code)
    }

    /// Language codes in pipeline order
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Check if a token is a stopword.
    #[inline]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Run every stemmer over a token, in order
    pub fn stem(&self, token: &str) -> String {
        self.stemmers
            .iter()
            .fold(token.to_string(), |acc, stem| stem(&acc))
    }

    /// Analyze text into index terms.
    ///
    /// # Example
    ///
    /// ```
    /// use docsearch_search::Analyzer;
    ///
    /// let tokens = Analyzer::english().analyze("The Quick Brown Foxes");
    /// assert_eq!(tokens, vec!["quick", "brown", "fox"]);
    /// ```
    pub fn analyze(&self, text: &str) -> Vec<String> {
        words(text)
            .into_iter()
            .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
            .filter(|w| !self.is_stopword(w))
            .map(|w| self.stem(&w))
            .filter(|w| !w.is_empty())
            .collect()
    }

    /// Normalize a prefix for wildcard matching.
    ///
    /// Prefixes are lowercased and stripped of punctuation but never stemmed,
    /// so `doc*` still reaches the stemmed vocabulary entry `document`.
    pub fn normalize_prefix(&self, text: &str) -> String {
        normalize(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_basic() {
        let tokens = Analyzer::english().analyze("Hello, World!");
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn test_analyze_filters_short() {
        // "I" and "a" filtered (< 2 chars); "a" is also a stopword
        let tokens = Analyzer::english().analyze("I am a test");
        assert_eq!(tokens, vec!["am", "test"]);
    }

    #[test]
    fn test_stopwords_removed() {
        let tokens = Analyzer::english().analyze("the quick and the dead");
        assert_eq!(tokens, vec!["quick", "dead"]);
    }

    #[test]
    fn test_stopwords_case_insensitive() {
        assert!(Analyzer::english().analyze("The AND Not").is_empty());
    }

    #[test]
    fn test_stemming_applied() {
        let tokens = Analyzer::english().analyze("running documents");
        assert_eq!(tokens, vec!["run", "document"]);
    }

    #[test]
    fn test_markdown_content() {
        let tokens = Analyzer::english().analyze("# Markdown 1st");
        assert_eq!(tokens, vec!["markdown", "1st"]);
    }

    #[test]
    fn test_bare_keeps_everything_long_enough() {
        let tokens = Analyzer::bare().analyze("the running dog");
        assert_eq!(tokens, vec!["the", "running", "dog"]);
    }

    #[test]
    fn test_add_language_idempotent() {
        let mut analyzer = Analyzer::english();
        analyzer.add_language("en", &["extra"], Arc::new(|s: &str| s.to_string()));
        assert_eq!(analyzer.languages(), &["en".to_string()]);
        assert!(!analyzer.is_stopword("extra"));
    }

    #[test]
    fn test_stemmers_chain_in_order() {
        let mut analyzer = Analyzer::bare();
        analyzer.add_language("x", &[], Arc::new(|s: &str| format!("{s}1")));
        analyzer.add_language("y", &[], Arc::new(|s: &str| format!("{s}2")));
        assert_eq!(analyzer.stem("ab"), "ab12");
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(Analyzer::english().normalize_prefix("Docu"), "docu");
    }
}
