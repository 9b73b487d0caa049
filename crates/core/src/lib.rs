//! Core types and traits for docsearch
//!
//! This crate defines the foundational types shared by the search engine and
//! the provider:
//! - Document: the repository record that gets indexed and returned
//! - DocumentQuery: structured fetch descriptor sent to the repository
//! - PluginConfig: plug-in configuration and the config validator
//! - Error types: ConfigError, FetchError, SearchError
//! - Traits: DocumentSource (the repository fetch capability)
//! - Limits: fetch cap, default result limit, fetch timeout

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod limits;
pub mod query;
pub mod traits;

// Re-export commonly used types and traits
pub use config::{default_events, validate_config, PluginConfig, CONFIG_KEY};
pub use document::Document;
pub use error::{ConfigError, FetchError, SearchError};
pub use limits::{DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_SEARCH_LIMIT, MAX_FETCH_LIMIT};
pub use query::{DocumentQuery, FieldSelection, SortDirection, INDEXED_FIELDS};
pub use traits::{BoxFuture, DocumentSource};
