//! Document source backed by the host dispatcher
//!
//! Fetches are routed through the `storage-query` event: the serialized
//! [`DocumentQuery`] is the payload and the first handler's answer must be a
//! JSON array of documents.

use crate::hooks::Hooks;
use docsearch_core::{BoxFuture, Document, DocumentQuery, DocumentSource, FetchError};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Event the repository answers document queries on
pub const STORAGE_QUERY_EVENT: &str = "storage-query";

/// [`DocumentSource`] that asks the host repository through hooks
///
/// Holds a weak reference: the dispatcher owns the provider's handlers, and
/// the provider owns this source.
pub struct HookDocumentSource {
    hooks: Weak<dyn Hooks>,
    event: String,
}

impl HookDocumentSource {
    /// Source that dispatches [`STORAGE_QUERY_EVENT`]
    pub fn new(hooks: &Arc<dyn Hooks>) -> Self {
        Self::with_event(hooks, STORAGE_QUERY_EVENT)
    }

    /// Source that dispatches a custom event
    pub fn with_event(hooks: &Arc<dyn Hooks>, event: impl Into<String>) -> Self {
        HookDocumentSource {
            hooks: Arc::downgrade(hooks),
            event: event.into(),
        }
    }

    async fn fetch_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, FetchError> {
        let hooks = self
            .hooks
            .upgrade()
            .ok_or_else(|| FetchError::source("host dispatcher was dropped"))?;
        let payload =
            serde_json::to_value(query).map_err(|e| FetchError::malformed(e.to_string()))?;

        debug!(target: "docsearch::store", event = %self.event, query = %query, "Fetching documents");

        let mut answers = hooks
            .fetch(&self.event, payload)
            .await
            .map_err(|e| FetchError::source(e.to_string()))?;
        if answers.is_empty() {
            return Err(FetchError::NoResponder {
                event: self.event.clone(),
            });
        }
        let first = answers.swap_remove(0);
        serde_json::from_value(first).map_err(|e| FetchError::malformed(e.to_string()))
    }
}

impl DocumentSource for HookDocumentSource {
    fn fetch<'a>(
        &'a self,
        query: &'a DocumentQuery,
    ) -> BoxFuture<'a, Result<Vec<Document>, FetchError>> {
        Box::pin(self.fetch_documents(query))
    }
}
