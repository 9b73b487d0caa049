//! Collaborator traits
//!
//! The repository is an external component; the search layer reaches it only
//! through [`DocumentSource`]. Implementations may be backed by a database, a
//! hook dispatcher or an in-memory collection.

use std::future::Future;
use std::pin::Pin;

use crate::document::Document;
use crate::error::FetchError;
use crate::query::DocumentQuery;

/// Type-erased, sendable future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Document fetch capability
///
/// Implementations must honour the query's semantics: field selection, slug
/// exclusion, slug inclusion and title ordering. Fetches are asynchronous and
/// may fail; callers treat every failure as recoverable.
///
/// Thread safety: sources are shared across tasks (requires Send + Sync).
pub trait DocumentSource: Send + Sync {
    /// Fetch the documents described by `query`
    fn fetch<'a>(&'a self, query: &'a DocumentQuery) -> BoxFuture<'a, Result<Vec<Document>, FetchError>>;
}
