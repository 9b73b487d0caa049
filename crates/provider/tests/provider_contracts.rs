//! Provider Contract Tests
//!
//! Validates the index lifecycle and query pipeline against the documented
//! guarantees:
//! - searches return whole documents in repository order
//! - every non-empty query is counted, failed or not
//! - document changes trigger rebuilds that never fail
//! - a failed fetch keeps the previous index
//! - rebuilds are serialized

use docsearch_core::{BoxFuture, Document, DocumentQuery, DocumentSource, FetchError, SearchError};
use docsearch_provider::{BuildOutcome, MemoryStore, SearchOptions, SearchProvider};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Helpers
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn fixture() -> Vec<Document> {
    vec![
        Document::new("first-document", "First Document")
            .with_content("# Markdown 1st")
            .with_tags(["cool", "blue"]),
        Document::new("second-document", "Second Document")
            .with_content("## Markdown 2nd")
            .with_tags(["cool", "red"]),
        Document::new("third-document", "Third Document")
            .with_content("### Markdown 3rd")
            .with_tags(["lame", "red", "blue"]),
    ]
}

fn slugs(documents: &[Document]) -> Vec<&str> {
    documents.iter().map(|d| d.slug.as_str()).collect()
}

/// Wraps a store; can be switched to fail every fetch
struct Switchable {
    store: Arc<MemoryStore>,
    failing: AtomicBool,
    fetches: AtomicUsize,
    delay: Duration,
}

impl Switchable {
    fn new(store: Arc<MemoryStore>) -> Arc<Self> {
        Self::with_delay(store, Duration::ZERO)
    }

    fn with_delay(store: Arc<MemoryStore>, delay: Duration) -> Arc<Self> {
        Arc::new(Switchable {
            store,
            failing: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
            delay,
        })
    }

    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl DocumentSource for Switchable {
    fn fetch<'a>(
        &'a self,
        query: &'a DocumentQuery,
    ) -> BoxFuture<'a, Result<Vec<Document>, FetchError>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(FetchError::source("repository offline"));
            }
            Ok(self.store.query(query))
        })
    }
}

async fn built(source: Arc<dyn DocumentSource>) -> SearchProvider {
    let provider = SearchProvider::builder(source).build().unwrap();
    assert!(provider.build_index().await.is_built());
    provider
}

// ============================================================================
// Query Executor
// ============================================================================

#[tokio::test]
async fn test_common_term_returns_all_in_title_order() {
    init_tracing();
    let provider = built(MemoryStore::with_documents(fixture())).await;
    let results = provider.search(&SearchOptions::query("document")).await.unwrap();
    assert_eq!(
        slugs(&results),
        vec!["first-document", "second-document", "third-document"]
    );
    // Full documents come back, not just indexed fields
    assert_eq!(results[0].content, "# Markdown 1st");
}

#[tokio::test]
async fn test_no_match_is_empty_and_counted() {
    let provider = built(MemoryStore::with_documents(fixture())).await;
    let results = provider.search(&SearchOptions::query("zebra")).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(provider.terms().count("zebra"), 1);
}

#[tokio::test]
async fn test_results_come_from_repository() {
    let store = MemoryStore::with_documents(fixture());
    let provider = built(store.clone()).await;

    // The repository changes without a rebuild
    store.upsert(
        Document::new("first-document", "First Document").with_content("edited body"),
    );
    let results = provider.search(&SearchOptions::query("blue")).await.unwrap();
    let first = results.iter().find(|d| d.slug == "first-document").unwrap();
    assert_eq!(first.content, "edited body");
}

#[tokio::test]
async fn test_projection_failure_yields_empty() {
    let source = Switchable::new(MemoryStore::with_documents(fixture()));
    let provider = built(source.clone()).await;
    source.fail(true);
    let results = provider.search(&SearchOptions::query("document")).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(provider.terms().count("document"), 1);
}

#[tokio::test]
async fn test_search_before_build_is_error() {
    let provider = SearchProvider::builder(MemoryStore::new()).build().unwrap();
    let err = provider
        .search(&SearchOptions::query("anything"))
        .await
        .unwrap_err();
    assert_eq!(err, SearchError::IndexNotBuilt);
    // Still counted
    assert_eq!(provider.terms().count("anything"), 1);
}

#[tokio::test]
async fn test_tags_dominate() {
    let store = MemoryStore::with_documents(vec![
        Document::new("a-body", "Aardvark").with_content("red red red red red"),
        Document::new("b-tag", "Badger").with_tags(["red"]),
    ]);
    let provider = built(store).await;
    let results = provider
        .search(&SearchOptions::query("red").with_limit(1))
        .await
        .unwrap();
    assert_eq!(slugs(&results), vec!["b-tag"]);
}

// ============================================================================
// Term Frequency Tracker
// ============================================================================

#[tokio::test]
async fn test_popular_terms() {
    let provider = built(MemoryStore::with_documents(fixture())).await;
    for (term, n) in [("a", 1), ("b", 2), ("c", 4), ("d", 3)] {
        for _ in 0..n {
            provider.search(&SearchOptions::query(term)).await.unwrap();
        }
    }
    assert_eq!(
        provider.get_popular_search_terms(Some(10)),
        vec!["c", "d", "b", "a"]
    );
    assert_eq!(provider.get_popular_search_terms(Some(1)), vec!["c"]);
}

#[tokio::test]
async fn test_empty_query_not_counted() {
    let provider = built(MemoryStore::with_documents(fixture())).await;
    provider.search(&SearchOptions::query("")).await.unwrap();
    provider.search(&SearchOptions::default()).await.unwrap();
    assert!(provider.get_popular_search_terms(None).is_empty());
}

// ============================================================================
// Index Builder
// ============================================================================

#[tokio::test]
async fn test_index_changes_rebuild_from_snapshot() {
    let store = MemoryStore::with_documents(fixture());
    let provider = built(store.clone()).await;

    store.upsert(Document::new("fourth-document", "Fourth Document"));
    assert!(provider.index_add(None).await.is_built());
    assert_eq!(provider.indexed_documents(), 4);

    store.remove("second-document");
    let removed = vec![Document::new("second-document", "Second Document")];
    assert!(provider.index_remove(Some(removed.as_slice())).await.is_built());
    assert_eq!(provider.indexed_documents(), 3);

    assert!(provider.index_update(Some(&[][..])).await.is_built());
    let results = provider.search(&SearchOptions::query("document")).await.unwrap();
    assert_eq!(
        slugs(&results),
        vec!["first-document", "fourth-document", "third-document"]
    );
}

#[tokio::test]
async fn test_index_changes_never_fail() {
    let source = Switchable::new(MemoryStore::with_documents(fixture()));
    let provider = SearchProvider::builder(source.clone()).build().unwrap();
    source.fail(true);
    assert!(!provider.index_add(None).await.is_built());
    assert!(!provider.index_update(None).await.is_built());
    assert!(!provider.index_remove(None).await.is_built());
    assert!(!provider.is_built());
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_index() {
    init_tracing();
    let source = Switchable::new(MemoryStore::with_documents(fixture()));
    let provider = built(source.clone()).await;
    let before = provider.search(&SearchOptions::query("red")).await.unwrap();
    let generation = provider.current_generation();

    source.fail(true);
    let outcome = provider.build_index().await;
    assert_eq!(
        outcome,
        BuildOutcome::Retained {
            reason: FetchError::source("repository offline")
        }
    );
    assert_eq!(provider.current_generation(), generation);

    source.fail(false);
    let after = provider.search(&SearchOptions::query("red")).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_rebuild_is_idempotent() {
    let provider = built(MemoryStore::with_documents(fixture())).await;
    let first = provider.search(&SearchOptions::query("cool markdown")).await.unwrap();
    provider.build_index().await;
    let second = provider.search(&SearchOptions::query("cool markdown")).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_ignored_slugs_excluded_everywhere() {
    let provider = SearchProvider::builder(MemoryStore::with_documents(fixture()))
        .ignore_slugs(["third-document"])
        .build()
        .unwrap();
    provider.build_index().await;
    let results = provider.search(&SearchOptions::query("lame")).await.unwrap();
    assert!(results.is_empty());
    let results = provider.search(&SearchOptions::query("red")).await.unwrap();
    assert_eq!(slugs(&results), vec!["second-document"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rebuilds_serialize() {
    let store = MemoryStore::with_documents(fixture());
    let source = Switchable::with_delay(store, Duration::from_millis(5));
    let provider = Arc::new(SearchProvider::builder(source.clone()).build().unwrap());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.build_index().await })
        })
        .collect();

    let mut generations = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            BuildOutcome::Built { generation, documents } => {
                assert_eq!(documents, 3);
                generations.push(generation);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    generations.sort_unstable();
    assert_eq!(generations, (1..=8).collect::<Vec<u64>>());
    assert_eq!(provider.current_generation(), 8);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_search_during_rebuild_sees_whole_index() {
    let store = MemoryStore::with_documents(fixture());
    let source = Switchable::with_delay(store.clone(), Duration::from_millis(20));
    let provider = Arc::new(SearchProvider::builder(source).build().unwrap());
    provider.build_index().await;

    store.upsert(Document::new("fourth-document", "Fourth Document"));
    let rebuild = {
        let provider = Arc::clone(&provider);
        tokio::spawn(async move { provider.build_index().await })
    };

    // Either the old three or the new four, never anything in between
    let results = provider.search(&SearchOptions::query("document")).await.unwrap();
    assert!(results.len() == 3 || results.len() == 4);

    rebuild.await.unwrap();
    let results = provider.search(&SearchOptions::query("document")).await.unwrap();
    assert_eq!(results.len(), 4);
}
