//! Locale extensions
//!
//! A locale extension is a named function that adds language support to an
//! [`Analyzer`]. Extensions are injected as values; the only name lookup is
//! the static [`builtin`] table for the languages shipped here.
//!
//! Extensions must be applied exactly once, in order, before the first index
//! is built. [`Bm25Engine::apply_locales`](crate::engine::Bm25Engine::apply_locales)
//! enforces this per engine instance.

use crate::analyzer::{Analyzer, ENGLISH_STOPWORDS};
use crate::stemmer;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from applying locale extensions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// Extensions were already applied to this engine
    #[error("locale extensions were already applied to this engine")]
    AlreadyApplied,
}

/// A named analyzer extension
#[derive(Clone)]
pub struct LocaleExtension {
    code: Cow<'static, str>,
    apply: Arc<dyn Fn(&mut Analyzer) + Send + Sync>,
}

impl fmt::Debug for LocaleExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleExtension")
            .field("code", &self.code)
            .finish()
    }
}

impl LocaleExtension {
    /// Wrap a function as a locale extension
    pub fn new<F>(code: impl Into<Cow<'static, str>>, apply: F) -> Self
    where
        F: Fn(&mut Analyzer) + Send + Sync + 'static,
    {
        LocaleExtension {
            code: code.into(),
            apply: Arc::new(apply),
        }
    }

    /// Locale code (e.g. `"fr"`)
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Apply to an analyzer
    pub fn apply(&self, analyzer: &mut Analyzer) {
        (self.apply)(analyzer)
    }
}

/// Apply extensions to an analyzer, in order.
pub fn load_locales(analyzer: &mut Analyzer, extensions: &[LocaleExtension]) {
    for extension in extensions {
        debug!(target: "docsearch::index", locale = extension.code(), "Applying locale extension");
        extension.apply(analyzer);
    }
}

const FRENCH_STOPWORDS: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "eux", "il",
    "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "même", "mes", "moi", "mon", "ne",
    "nos", "notre", "nous", "on", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa", "se",
    "ses", "son", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos", "votre",
    "vous",
];

const GERMAN_STOPWORDS: &[&str] = &[
    "aber", "als", "am", "an", "auch", "auf", "aus", "bei", "bin", "bis", "das", "dass", "dem",
    "den", "der", "des", "die", "du", "ein", "eine", "einem", "einen", "einer", "eines", "er",
    "es", "für", "hat", "ich", "ihr", "im", "in", "ist", "ja", "mit", "nach", "nicht", "noch",
    "oder", "sie", "sind", "so", "und", "uns", "von", "vor", "war", "was", "wie", "wir", "zu",
    "zum", "zur",
];

const SPANISH_STOPWORDS: &[&str] = &[
    "al", "como", "con", "de", "del", "el", "en", "es", "esta", "este", "la", "las", "lo", "los",
    "mas", "más", "mi", "no", "nos", "para", "pero", "por", "que", "se", "si", "sin", "su", "sus",
    "un", "una", "uno", "ya",
];

/// English (already the default pipeline; applying it again changes nothing)
pub fn english() -> LocaleExtension {
    LocaleExtension::new("en", |analyzer: &mut Analyzer| {
        analyzer.add_language("en", ENGLISH_STOPWORDS, Arc::new(stemmer::english));
    })
}

/// French
pub fn french() -> LocaleExtension {
    LocaleExtension::new("fr", |analyzer: &mut Analyzer| {
        analyzer.add_language("fr", FRENCH_STOPWORDS, Arc::new(stemmer::french));
    })
}

/// German
pub fn german() -> LocaleExtension {
    LocaleExtension::new("de", |analyzer: &mut Analyzer| {
        analyzer.add_language("de", GERMAN_STOPWORDS, Arc::new(stemmer::german));
    })
}

/// Spanish
pub fn spanish() -> LocaleExtension {
    LocaleExtension::new("es", |analyzer: &mut Analyzer| {
        analyzer.add_language("es", SPANISH_STOPWORDS, Arc::new(stemmer::spanish));
    })
}

/// Built-in extension for a locale code
pub fn builtin(code: &str) -> Option<LocaleExtension> {
    match code {
        "en" => Some(english()),
        "fr" => Some(french()),
        "de" => Some(german()),
        "es" => Some(spanish()),
        _ => None,
    }
}
