//! Search provider for docsearch
//!
//! This crate ties the index engine to a document repository and a host:
//! - SearchProvider: index lifecycle (rebuild, swap) and query pipeline
//! - TermCounter: query popularity
//! - Hooks / EventDispatcher: host event dispatch
//! - HookDocumentSource: repository access through host hooks
//! - MemoryStore: in-memory repository
//! - Plugin: registration and event wiring
//!
//! # Usage
//!
//! ```
//! use docsearch_core::Document;
//! use docsearch_provider::{SearchOptions, SearchProvider, MemoryStore};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = MemoryStore::with_documents(vec![
//!     Document::new("intro", "Introduction").with_content("getting started"),
//! ]);
//! let provider = SearchProvider::builder(store).build().unwrap();
//! provider.build_index().await;
//!
//! let results = provider.search(&SearchOptions::query("started")).await.unwrap();
//! assert_eq!(results[0].slug, "intro");
//! assert_eq!(provider.get_popular_search_terms(None), vec!["started"]);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hooks;
pub mod memory;
pub mod plugin;
pub mod provider;
pub mod source;
pub mod terms;

pub use error::{Error, HookError, Result};
pub use hooks::{handler, Context, EventDispatcher, HookHandler, Hooks};
pub use memory::{MemoryStore, STORAGE_ADD_EVENT, STORAGE_DELETE_EVENT, STORAGE_UPDATE_EVENT};
pub use plugin::{Operation, Plugin, PluginOptions};
pub use provider::{BuildOutcome, SearchOptions, SearchProvider, SearchProviderBuilder};
pub use source::{HookDocumentSource, STORAGE_QUERY_EVENT};
pub use terms::TermCounter;
