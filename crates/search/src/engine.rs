//! Index engine capability
//!
//! This module provides:
//! - IndexEngine trait: builds an immutable index from a document snapshot
//! - IndexHandle trait: queries a built index
//! - ScoredRef: one ranked result
//! - Bm25Engine: default engine backed by [`InvertedIndex`]
//!
//! The provider only talks to these traits, so a different ranking engine can
//! be swapped in without touching it.

use crate::analyzer::Analyzer;
use crate::index::{FieldSchema, InvertedIndex};
use crate::locale::{load_locales, LocaleError, LocaleExtension};
use crate::query::QueryError;
use docsearch_core::Document;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Traits
// ============================================================================

/// A ranked reference returned by a query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRef {
    /// Reference field value (the document slug)
    pub reference: String,
    /// Relevance score (higher = more relevant)
    pub score: f32,
}

/// A built, read-only index
pub trait IndexHandle: Send + Sync {
    /// Run a query string, best match first
    fn query(&self, text: &str) -> Result<Vec<ScoredRef>, QueryError>;

    /// Number of indexed documents
    fn len(&self) -> usize;

    /// Whether no documents are indexed
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a reference is indexed
    fn contains(&self, reference: &str) -> bool;
}

/// Builds indexes
pub trait IndexEngine: Send + Sync {
    /// Build an index over a document snapshot
    fn build(&self, documents: &[Document], schema: &FieldSchema) -> Arc<dyn IndexHandle>;

    /// Engine name, for logs
    fn name(&self) -> &str;
}

// ============================================================================
// Bm25Engine
// ============================================================================

/// BM25 parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term frequency saturation (default: 1.2)
    pub k1: f32,
    /// Length normalization (default: 0.75)
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Bm25Params { k1: 1.2, b: 0.75 }
    }
}

/// Default index engine
///
/// Locale extensions mutate the engine's analyzer, so they are applied once
/// through [`Bm25Engine::apply_locales`] before the first build. Indexes
/// already built keep the analyzer they were built with.
#[derive(Debug, Clone, Default)]
pub struct Bm25Engine {
    analyzer: Arc<Analyzer>,
    params: Bm25Params,
    locales_applied: bool,
}

impl Bm25Engine {
    /// Engine with the English analyzer and default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set BM25 parameters
    pub fn with_params(mut self, params: Bm25Params) -> Self {
        self.params = params;
        self
    }

    /// Builder: start from a custom analyzer
    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = Arc::new(analyzer);
        self
    }

    /// Apply locale extensions to this engine's analyzer.
    ///
    /// Allowed once per engine. An empty list still counts as the one call.
    pub fn apply_locales(&mut self, extensions: &[LocaleExtension]) -> Result<(), LocaleError> {
        if self.locales_applied {
            return Err(LocaleError::AlreadyApplied);
        }
        load_locales(Arc::make_mut(&mut self.analyzer), extensions);
        self.locales_applied = true;
        Ok(())
    }

    /// Current analyzer
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// BM25 parameters
    pub fn params(&self) -> Bm25Params {
        self.params
    }
}

impl IndexEngine for Bm25Engine {
    fn build(&self, documents: &[Document], schema: &FieldSchema) -> Arc<dyn IndexHandle> {
        let index = InvertedIndex::build(documents, schema, Arc::clone(&self.analyzer), self.params);
        debug!(
            target: "docsearch::index",
            engine = self.name(),
            documents = index.total_docs(),
            "Built index"
        );
        Arc::new(index)
    }

    fn name(&self) -> &str {
        "bm25"
    }
}
