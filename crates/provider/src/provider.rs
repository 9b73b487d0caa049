//! Search provider: index lifecycle and query pipeline
//!
//! # Index lifecycle
//!
//! The index is immutable. Every build fetches a fresh snapshot from the
//! [`DocumentSource`], builds a brand-new index over it and swaps it in under
//! a write lock. A failed fetch leaves the previous index in place.
//!
//! Rebuilds are serialized: a single async guard is held across fetch and
//! build, so rebuilds complete in the order they started and the last one to
//! start is the one left installed. Each installed index carries a
//! generation number.
//!
//! # Query pipeline
//!
//! 1. Rank references against the current index
//! 2. Truncate to the limit
//! 3. Fetch the full documents for those references
//!
//! The index holds indexed fields only, so results always come from the
//! repository.
//!
//! # Thread Safety
//!
//! Readers clone the current index handle and drop the lock before querying,
//! so a rebuild never blocks a search for longer than the swap.

use crate::error::Error;
use crate::terms::TermCounter;
use docsearch_core::{
    ConfigError, Document, DocumentQuery, DocumentSource, FetchError, PluginConfig, SearchError,
    DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_SEARCH_LIMIT,
};
use docsearch_search::{locale, Bm25Engine, FieldSchema, IndexEngine, IndexHandle, LocaleExtension};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Document field that identifies an index entry; the projection fetch
/// filters on it.
const REFERENCE_FIELD: &str = "slug";

/// Arguments to [`SearchProvider::search`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Free-text query
    pub query: Option<String>,
    /// Maximum results (default 100)
    pub limit: Option<usize>,
}

impl SearchOptions {
    /// Options for a query with the default limit
    pub fn query(query: impl Into<String>) -> Self {
        SearchOptions {
            query: Some(query.into()),
            limit: None,
        }
    }

    /// Builder: set the limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Result of a rebuild
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// A new index was installed
    Built {
        /// Documents in the new index
        documents: usize,
        /// Generation of the new index
        generation: u64,
    },
    /// The fetch failed; the previous index (if any) is still installed
    Retained {
        /// Why the fetch failed
        reason: FetchError,
    },
}

impl BuildOutcome {
    /// Whether a new index was installed
    pub fn is_built(&self) -> bool {
        matches!(self, BuildOutcome::Built { .. })
    }
}

#[derive(Clone)]
struct IndexSnapshot {
    handle: Arc<dyn IndexHandle>,
    generation: u64,
}

/// Index lifecycle and query pipeline over a document source
pub struct SearchProvider {
    ignore_slugs: Vec<String>,
    fetch_timeout: Duration,
    engine: Box<dyn IndexEngine>,
    schema: FieldSchema,
    source: Arc<dyn DocumentSource>,
    index: RwLock<Option<IndexSnapshot>>,
    generation: AtomicU64,
    rebuild_guard: tokio::sync::Mutex<()>,
    terms: TermCounter,
}

impl std::fmt::Debug for SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchProvider")
            .field("engine", &self.engine.name())
            .field("ignore_slugs", &self.ignore_slugs)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("generation", &self.current_generation())
            .finish()
    }
}

impl SearchProvider {
    /// Start building a provider over `source`
    pub fn builder(source: Arc<dyn DocumentSource>) -> SearchProviderBuilder {
        SearchProviderBuilder::new(source)
    }

    // ========================================================================
    // Index Builder
    // ========================================================================

    /// Rebuild the index from a fresh snapshot.
    ///
    /// Never fails: a fetch failure is logged and the previous index is kept.
    pub async fn build_index(&self) -> BuildOutcome {
        let _guard = self.rebuild_guard.lock().await;

        let query = DocumentQuery::snapshot(self.ignore_slugs.iter().cloned());
        let documents = match self.fetch(&query).await {
            Ok(documents) => documents,
            Err(reason) => {
                warn!(
                    target: "docsearch::index",
                    error = %reason,
                    generation = self.current_generation(),
                    "Index rebuild aborted, keeping previous index"
                );
                return BuildOutcome::Retained { reason };
            }
        };

        let handle = self.engine.build(&documents, &self.schema);
        let indexed = handle.len();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.index.write() = Some(IndexSnapshot { handle, generation });

        info!(
            target: "docsearch::index",
            fetched = documents.len(),
            indexed,
            generation,
            "Index rebuilt"
        );
        BuildOutcome::Built {
            documents: indexed,
            generation,
        }
    }

    /// Rebuild after documents were added. The documents are not inspected.
    pub async fn index_add(&self, documents: Option<&[Document]>) -> BuildOutcome {
        self.rebuild_after("index_add", documents).await
    }

    /// Rebuild after documents were updated. The documents are not inspected.
    pub async fn index_update(&self, documents: Option<&[Document]>) -> BuildOutcome {
        self.rebuild_after("index_update", documents).await
    }

    /// Rebuild after documents were removed. The documents are not inspected.
    pub async fn index_remove(&self, documents: Option<&[Document]>) -> BuildOutcome {
        self.rebuild_after("index_remove", documents).await
    }

    async fn rebuild_after(&self, operation: &str, documents: Option<&[Document]>) -> BuildOutcome {
        debug!(
            target: "docsearch::index",
            operation,
            changed = documents.map_or(0, <[Document]>::len),
            "Document change, rebuilding"
        );
        self.build_index().await
    }

    // ========================================================================
    // Query Executor
    // ========================================================================

    /// Run a query and return full documents for the best `limit` matches.
    ///
    /// Errors only when no index has been built yet. Query parse errors and
    /// projection fetch failures are logged and yield an empty result.
    pub async fn internal_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Document>, SearchError> {
        let handle = self.current_index().ok_or(SearchError::IndexNotBuilt)?;

        let hits = match handle.query(query) {
            Ok(hits) => hits,
            Err(e) => {
                warn!(target: "docsearch::search", query, error = %e, "Query rejected");
                return Ok(Vec::new());
            }
        };

        let refs: Vec<String> = hits
            .into_iter()
            .map(|hit| hit.reference)
            .filter(|r| !r.is_empty())
            .take(limit)
            .collect();
        if refs.is_empty() {
            debug!(target: "docsearch::search", query, "No matches");
            return Ok(Vec::new());
        }

        let matched = refs.len();
        let projection = DocumentQuery::projection(self.ignore_slugs.iter().cloned(), refs);
        match self.fetch(&projection).await {
            Ok(documents) => {
                debug!(
                    target: "docsearch::search",
                    query,
                    matched,
                    returned = documents.len(),
                    "Search complete"
                );
                Ok(documents)
            }
            Err(e) => {
                warn!(target: "docsearch::search", query, error = %e, "Result projection failed");
                Ok(Vec::new())
            }
        }
    }

    /// Record the query, then search.
    ///
    /// A missing query counts as empty: it is not recorded and matches nothing.
    pub async fn search(&self, options: &SearchOptions) -> Result<Vec<Document>, SearchError> {
        let query = options.query.as_deref().unwrap_or("");
        self.terms.record(query);
        let limit = options.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        self.internal_search(query, limit).await
    }

    // ========================================================================
    // Term Frequency Tracker
    // ========================================================================

    /// Most searched queries, highest count first
    pub fn get_popular_search_terms(&self, limit: Option<usize>) -> Vec<String> {
        self.terms.top(limit)
    }

    /// Query counter
    pub fn terms(&self) -> &TermCounter {
        &self.terms
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Generation of the installed index (0 = none)
    pub fn current_generation(&self) -> u64 {
        self.index.read().as_ref().map_or(0, |s| s.generation)
    }

    /// Whether an index is installed
    pub fn is_built(&self) -> bool {
        self.index.read().is_some()
    }

    /// Documents in the installed index
    pub fn indexed_documents(&self) -> usize {
        self.current_index().map_or(0, |h| h.len())
    }

    /// Slugs excluded from indexing and results
    pub fn ignore_slugs(&self) -> &[String] {
        &self.ignore_slugs
    }

    fn current_index(&self) -> Option<Arc<dyn IndexHandle>> {
        self.index.read().as_ref().map(|s| Arc::clone(&s.handle))
    }

    async fn fetch(&self, query: &DocumentQuery) -> Result<Vec<Document>, FetchError> {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch(query)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                after: self.fetch_timeout,
            }),
        }
    }
}

/// Builder for [`SearchProvider`]
pub struct SearchProviderBuilder {
    source: Arc<dyn DocumentSource>,
    ignore_slugs: Vec<String>,
    locale_codes: Vec<String>,
    locales: Vec<LocaleExtension>,
    fetch_timeout: Duration,
    engine: Option<Box<dyn IndexEngine>>,
    schema: FieldSchema,
}

impl SearchProviderBuilder {
    fn new(source: Arc<dyn DocumentSource>) -> Self {
        SearchProviderBuilder {
            source,
            ignore_slugs: Vec::new(),
            locale_codes: Vec::new(),
            locales: Vec::new(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            engine: None,
            schema: FieldSchema::document_default(),
        }
    }

    /// Take ignore slugs, locale codes and fetch timeout from a config
    pub fn config(mut self, config: &PluginConfig) -> Self {
        self.ignore_slugs = config.ignore_slugs.clone();
        self.locale_codes = config.locales.clone();
        self.fetch_timeout = config.fetch_timeout();
        self
    }

    /// Slugs excluded from indexing and results
    pub fn ignore_slugs<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_slugs = slugs.into_iter().map(Into::into).collect();
        self
    }

    /// Add a locale extension; applied after built-in codes, in call order
    pub fn locale(mut self, extension: LocaleExtension) -> Self {
        self.locales.push(extension);
        self
    }

    /// Bound on each repository fetch
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Use a custom engine instead of [`Bm25Engine`].
    ///
    /// Locale extensions only apply to the default engine.
    pub fn engine(mut self, engine: impl IndexEngine + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    /// Override the indexed fields and their boosts.
    ///
    /// Results are fetched back by slug, so the reference field must stay
    /// `slug`; [`build`](Self::build) rejects anything else.
    pub fn schema(mut self, schema: FieldSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Resolve locales and build the provider. No index is built yet.
    pub fn build(self) -> Result<SearchProvider, Error> {
        if self.schema.reference != REFERENCE_FIELD {
            return Err(ConfigError::InvalidField {
                field: "schema.reference".to_string(),
                expected: "`slug`",
            }
            .into());
        }
        let mut extensions = Vec::with_capacity(self.locale_codes.len() + self.locales.len());
        for code in &self.locale_codes {
            let extension =
                locale::builtin(code).ok_or_else(|| ConfigError::UnknownLocale { code: code.clone() })?;
            extensions.push(extension);
        }
        extensions.extend(self.locales);

        let engine: Box<dyn IndexEngine> = match self.engine {
            Some(engine) => {
                if !extensions.is_empty() {
                    warn!(
                        target: "docsearch::plugin",
                        engine = engine.name(),
                        locales = extensions.len(),
                        "Locale extensions ignored for custom engine"
                    );
                }
                engine
            }
            None => {
                let mut engine = Bm25Engine::new();
                engine.apply_locales(&extensions)?;
                Box::new(engine)
            }
        };

        Ok(SearchProvider {
            ignore_slugs: self.ignore_slugs,
            fetch_timeout: self.fetch_timeout,
            engine,
            schema: self.schema,
            source: self.source,
            index: RwLock::new(None),
            generation: AtomicU64::new(0),
            rebuild_guard: tokio::sync::Mutex::new(()),
            terms: TermCounter::new(),
        })
    }
}
