//! docsearch - Full-text search provider for document repositories
//!
//! docsearch plugs into a host that owns document storage and an event
//! dispatcher. It keeps a field-weighted full-text index over the host's
//! documents, answers ranked queries with whole documents and tracks the most
//! popular queries.
//!
//! # Quick Start
//!
//! ```ignore
//! use docsearch::{Context, EventDispatcher, MemoryStore, Plugin, PluginOptions};
//!
//! let hooks = EventDispatcher::new();
//! MemoryStore::with_documents(docs).register(hooks.as_ref());
//!
//! let context = Context::new(serde_json::Value::Null, hooks.clone());
//! Plugin::register(&context, PluginOptions::default()).await?;
//!
//! let results = hooks.fetch("search-query", json!({ "query": "document" })).await?;
//! ```
//!
//! # Architecture
//!
//! - `docsearch-core`: documents, fetch queries, configuration, errors
//! - `docsearch-search`: analyzer, locales, query parser, BM25 index engine
//! - `docsearch-provider`: index lifecycle, query pipeline, hook wiring

pub use docsearch_core::{
    default_events, validate_config, BoxFuture, ConfigError, Document, DocumentQuery,
    DocumentSource, FetchError, FieldSelection, PluginConfig, SearchError, SortDirection,
    CONFIG_KEY, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_SEARCH_LIMIT, MAX_FETCH_LIMIT,
};
pub use docsearch_provider::*;
pub use docsearch_search::{
    locale, Analyzer, Bm25Engine, Bm25Params, FieldSchema, IndexEngine, IndexHandle,
    LocaleError, LocaleExtension, QueryError, ScoredRef,
};
