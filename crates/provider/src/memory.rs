//! In-memory document repository
//!
//! A [`DocumentSource`] over a `Vec<Document>`, plus hook wiring so it can
//! stand in for a host repository on an [`EventDispatcher`](crate::EventDispatcher).
//!
//! | Event | Payload | Answer |
//! |-------|---------|--------|
//! | `storage-query` | serialized [`DocumentQuery`] | array of documents |
//! | `storage-add`, `storage-update` | document or array of documents | `null` |
//! | `storage-delete` | slug, array of slugs, or documents | `null` |

use crate::error::HookError;
use crate::hooks::{handler, Hooks};
use crate::source::STORAGE_QUERY_EVENT;
use docsearch_core::{BoxFuture, Document, DocumentQuery, DocumentSource, FetchError};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Event that inserts documents
pub const STORAGE_ADD_EVENT: &str = "storage-add";
/// Event that replaces documents by slug
pub const STORAGE_UPDATE_EVENT: &str = "storage-update";
/// Event that deletes documents by slug
pub const STORAGE_DELETE_EVENT: &str = "storage-delete";

/// In-memory repository
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a store holding `documents`
    pub fn with_documents(documents: Vec<Document>) -> Arc<Self> {
        Arc::new(MemoryStore {
            documents: RwLock::new(documents),
        })
    }

    /// Insert a document, replacing any document with the same slug
    pub fn upsert(&self, document: Document) {
        let mut documents = self.documents.write();
        match documents.iter_mut().find(|d| d.slug == document.slug) {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
    }

    /// Remove a document by slug; returns whether it existed
    pub fn remove(&self, slug: &str) -> bool {
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|d| d.slug != slug);
        documents.len() != before
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Evaluate a query against the stored documents
    pub fn query(&self, query: &DocumentQuery) -> Vec<Document> {
        let snapshot = self.documents.read().clone();
        query.apply(snapshot)
    }

    /// Answer the storage events on `hooks`
    pub fn register(self: &Arc<Self>, hooks: &dyn Hooks) {
        let store = Arc::clone(self);
        hooks.on(
            STORAGE_QUERY_EVENT,
            handler(move |payload| {
                let store = Arc::clone(&store);
                async move {
                    let query: DocumentQuery = serde_json::from_value(payload)
                        .map_err(|e| HookError::invalid_payload(STORAGE_QUERY_EVENT, e.to_string()))?;
                    let documents = store.query(&query);
                    serde_json::to_value(documents).map_err(|e| HookError::Handler(e.to_string()))
                }
            }),
        );

        for event in [STORAGE_ADD_EVENT, STORAGE_UPDATE_EVENT] {
            let store = Arc::clone(self);
            hooks.on(
                event,
                handler(move |payload| {
                    let store = Arc::clone(&store);
                    async move {
                        for document in documents_from(event, payload)? {
                            debug!(target: "docsearch::store", slug = %document.slug, "Upserting");
                            store.upsert(document);
                        }
                        Ok(Value::Null)
                    }
                }),
            );
        }

        let store = Arc::clone(self);
        hooks.on(
            STORAGE_DELETE_EVENT,
            handler(move |payload| {
                let store = Arc::clone(&store);
                async move {
                    for slug in slugs_from(payload)? {
                        debug!(target: "docsearch::store", slug = %slug, "Deleting");
                        store.remove(&slug);
                    }
                    Ok(Value::Null)
                }
            }),
        );
    }
}

impl DocumentSource for MemoryStore {
    fn fetch<'a>(
        &'a self,
        query: &'a DocumentQuery,
    ) -> BoxFuture<'a, Result<Vec<Document>, FetchError>> {
        let documents = self.query(query);
        Box::pin(async move { Ok(documents) })
    }
}

fn documents_from(event: &str, payload: Value) -> Result<Vec<Document>, HookError> {
    let parsed = match payload {
        Value::Array(_) => serde_json::from_value::<Vec<Document>>(payload),
        other => serde_json::from_value::<Document>(other).map(|d| vec![d]),
    };
    parsed.map_err(|e| HookError::invalid_payload(event, e.to_string()))
}

fn slugs_from(payload: Value) -> Result<Vec<String>, HookError> {
    fn slug_of(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("slug").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    let items = match &payload {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| {
            slug_of(item).ok_or_else(|| {
                HookError::invalid_payload(STORAGE_DELETE_EVENT, "expected a slug or a document")
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::EventDispatcher;
    use serde_json::json;

    fn store() -> Arc<MemoryStore> {
        MemoryStore::with_documents(vec![
            Document::new("b", "Bravo"),
            Document::new("a", "Alpha"),
            Document::new("hidden", "Charlie"),
        ])
    }

    #[tokio::test]
    async fn test_fetch_honours_query() {
        let store = store();
        let docs = store.fetch(&DocumentQuery::snapshot(["hidden"])).await.unwrap();
        let slugs: Vec<&str> = docs.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[test]
    fn test_upsert_and_remove() {
        let store = store();
        store.upsert(Document::new("a", "Alpha v2"));
        assert_eq!(store.len(), 3);
        store.upsert(Document::new("d", "Delta"));
        assert_eq!(store.len(), 4);
        assert!(store.remove("d"));
        assert!(!store.remove("d"));
    }

    #[tokio::test]
    async fn test_storage_events() {
        let hooks = EventDispatcher::new();
        let store = MemoryStore::new();
        store.register(hooks.as_ref());

        hooks
            .fetch(STORAGE_ADD_EVENT, json!({"slug": "x", "title": "X"}))
            .await
            .unwrap();
        hooks
            .fetch(
                STORAGE_ADD_EVENT,
                json!([{"slug": "y", "title": "Y"}, {"slug": "z", "title": "Z"}]),
            )
            .await
            .unwrap();
        assert_eq!(store.len(), 3);

        hooks
            .fetch(STORAGE_UPDATE_EVENT, json!({"slug": "x", "title": "X2"}))
            .await
            .unwrap();
        hooks
            .fetch(STORAGE_DELETE_EVENT, json!(["y", {"slug": "z"}]))
            .await
            .unwrap();

        let answer = hooks
            .fetch(
                STORAGE_QUERY_EVENT,
                serde_json::to_value(DocumentQuery::snapshot(Vec::<String>::new())).unwrap(),
            )
            .await
            .unwrap();
        let docs: Vec<Document> = serde_json::from_value(answer[0].clone()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "X2");
    }

    #[tokio::test]
    async fn test_bad_payloads() {
        let hooks = EventDispatcher::new();
        MemoryStore::new().register(hooks.as_ref());
        assert!(hooks.fetch(STORAGE_DELETE_EVENT, json!(42)).await.is_err());
        assert!(hooks.fetch(STORAGE_ADD_EVENT, json!("nope")).await.is_err());
        assert!(hooks.fetch(STORAGE_QUERY_EVENT, json!({})).await.is_err());
    }
}
