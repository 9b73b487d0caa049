//! Full-text index engine for docsearch
//!
//! This crate provides:
//! - Analyzer: text analysis pipeline (segmentation, stopwords, stemming)
//! - LocaleExtension: language support applied to an analyzer
//! - Query parser: clauses with presence, field scope, wildcard and boost
//! - InvertedIndex: immutable field-weighted BM25 index over documents
//! - IndexEngine / IndexHandle: the capability the provider builds against
//!
//! # Usage
//!
//! ```
//! use docsearch_core::Document;
//! use docsearch_search::{Bm25Engine, FieldSchema, IndexEngine};
//!
//! let engine = Bm25Engine::new();
//! let docs = vec![Document::new("intro", "Introduction").with_content("getting started")];
//! let index = engine.build(&docs, &FieldSchema::document_default());
//! let hits = index.query("started").unwrap();
//! assert_eq!(hits[0].reference, "intro");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod engine;
pub mod index;
pub mod locale;
pub mod query;
pub mod stemmer;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::{Analyzer, Stemmer};
pub use engine::{Bm25Engine, Bm25Params, IndexEngine, IndexHandle, ScoredRef};
pub use index::{FieldSchema, FieldSpec, InvertedIndex, PostingEntry, PostingList, TAG_BOOST};
pub use locale::{load_locales, LocaleError, LocaleExtension};
pub use query::{parse_query, Clause, Presence, QueryError};
pub use tokenizer::words;
