//! Host plug-in adapter
//!
//! [`Plugin::register`] validates the host context, builds a
//! [`SearchProvider`] that reads documents through the host's hooks, runs
//! the initial index build and binds each configured operation to its
//! events.
//!
//! Handler payloads and answers:
//!
//! | Operation | Payload | Answer |
//! |-----------|---------|--------|
//! | `search` | `{query?, limit?}` or a query string | array of documents |
//! | `build_index`, `index_add`, `index_update`, `index_remove` | anything | `null` |
//! | `get_popular_search_terms` | `{limit?}` | array of strings |
//! | `validate_config` | configuration bag | `null` |

use crate::error::{Error, HookError};
use crate::hooks::{handler, Context, HookHandler};
use crate::provider::{SearchOptions, SearchProvider};
use crate::source::HookDocumentSource;
use docsearch_core::{
    validate_config, ConfigError, Document, DocumentSource, PluginConfig, CONFIG_KEY,
};
use docsearch_search::LocaleExtension;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Provider operations that can be bound to host events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Record and run a query
    Search,
    /// Rebuild the index
    BuildIndex,
    /// Rebuild after an add
    IndexAdd,
    /// Rebuild after an update
    IndexUpdate,
    /// Rebuild after a removal
    IndexRemove,
    /// Most searched queries
    GetPopularSearchTerms,
    /// Check a configuration bag
    ValidateConfig,
}

impl Operation {
    /// Every operation
    pub const ALL: [Operation; 7] = [
        Operation::Search,
        Operation::BuildIndex,
        Operation::IndexAdd,
        Operation::IndexUpdate,
        Operation::IndexRemove,
        Operation::GetPopularSearchTerms,
        Operation::ValidateConfig,
    ];

    /// Parse an operation name, in snake_case or camelCase
    pub fn parse(name: &str) -> Option<Self> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().replace('_', "") == folded)
    }

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::BuildIndex => "build_index",
            Operation::IndexAdd => "index_add",
            Operation::IndexUpdate => "index_update",
            Operation::IndexRemove => "index_remove",
            Operation::GetPopularSearchTerms => "get_popular_search_terms",
            Operation::ValidateConfig => "validate_config",
        }
    }

    async fn invoke(
        self,
        provider: &SearchProvider,
        event: &str,
        payload: Value,
    ) -> Result<Value, HookError> {
        debug!(target: "docsearch::plugin", operation = self.as_str(), event, "Handling event");
        match self {
            Operation::Search => {
                let options = match payload {
                    Value::Null => SearchOptions::default(),
                    Value::String(query) => SearchOptions::query(query),
                    other => serde_json::from_value(other)
                        .map_err(|e| HookError::invalid_payload(event, e.to_string()))?,
                };
                let documents = provider.search(&options).await?;
                to_answer(&documents)
            }
            Operation::BuildIndex => {
                provider.build_index().await;
                Ok(Value::Null)
            }
            Operation::IndexAdd | Operation::IndexUpdate | Operation::IndexRemove => {
                let documents = changed_documents(payload);
                let documents = documents.as_deref();
                match self {
                    Operation::IndexAdd => provider.index_add(documents).await,
                    Operation::IndexUpdate => provider.index_update(documents).await,
                    _ => provider.index_remove(documents).await,
                };
                Ok(Value::Null)
            }
            Operation::GetPopularSearchTerms => {
                let options: TermsOptions = match payload {
                    Value::Null => TermsOptions::default(),
                    other => serde_json::from_value(other)
                        .map_err(|e| HookError::invalid_payload(event, e.to_string()))?,
                };
                to_answer(&provider.get_popular_search_terms(options.limit))
            }
            Operation::ValidateConfig => {
                validate_config(&payload)?;
                Ok(Value::Null)
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TermsOptions {
    limit: Option<usize>,
}

/// Index-change payloads are informational; anything unreadable counts as none.
fn changed_documents(payload: Value) -> Option<Vec<Document>> {
    match payload {
        Value::Array(_) => serde_json::from_value(payload).ok(),
        Value::Object(_) => serde_json::from_value(payload).ok().map(|d: Document| vec![d]),
        _ => None,
    }
}

fn to_answer<T: serde::Serialize>(value: &T) -> Result<Value, HookError> {
    serde_json::to_value(value).map_err(|e| HookError::Handler(e.to_string()))
}

fn operation_handler(operation: Operation, event: &str, provider: Arc<SearchProvider>) -> HookHandler {
    let event = event.to_string();
    handler(move |payload| {
        let provider = Arc::clone(&provider);
        let event = event.clone();
        async move { operation.invoke(&provider, &event, payload).await }
    })
}

/// Registration options the configuration bag cannot carry
#[derive(Default)]
pub struct PluginOptions {
    /// Locale extensions applied after the configured built-in codes
    pub locales: Vec<LocaleExtension>,
    /// Document source; defaults to the host's `storage-query` hook
    pub source: Option<Arc<dyn DocumentSource>>,
}

impl fmt::Debug for PluginOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginOptions")
            .field("locales", &self.locales)
            .field("source", &self.source.is_some())
            .finish()
    }
}

impl PluginOptions {
    /// Builder: add a locale extension
    pub fn locale(mut self, extension: LocaleExtension) -> Self {
        self.locales.push(extension);
        self
    }

    /// Builder: read documents from `source` instead of the host hooks
    pub fn source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }
}

/// Search provider plug-in
#[derive(Debug, Clone, Copy, Default)]
pub struct Plugin;

impl Plugin {
    /// Key of this plug-in's section in the host configuration bag
    pub fn config_key() -> &'static str {
        CONFIG_KEY
    }

    /// Settings used when the host supplies none
    pub fn default_config() -> PluginConfig {
        PluginConfig::default()
    }

    /// Check a host configuration bag without registering
    pub fn validate_config(bag: &Value) -> Result<(), ConfigError> {
        validate_config(bag)
    }

    /// Register the provider with the host.
    ///
    /// Fails without registering anything when the context has no
    /// dispatcher, the configuration is malformed or clears `events`, or a
    /// locale code is unknown. A failed initial build is not an error.
    pub async fn register(
        context: &Context,
        options: PluginOptions,
    ) -> Result<Arc<SearchProvider>, Error> {
        let hooks = context
            .hooks
            .clone()
            .ok_or(ConfigError::MissingDispatcher)?;
        let config = PluginConfig::from_context_bag(&context.config)?;
        let events = config.events.clone().ok_or(ConfigError::MissingEvents)?;

        let source: Arc<dyn DocumentSource> = match options.source {
            Some(source) => source,
            None => Arc::new(HookDocumentSource::new(&hooks)),
        };
        let mut builder = SearchProvider::builder(source).config(&config);
        for extension in options.locales {
            builder = builder.locale(extension);
        }
        let provider = Arc::new(builder.build()?);

        let outcome = provider.build_index().await;
        info!(target: "docsearch::plugin", outcome = ?outcome, "Initial index build");

        let mut bound = 0usize;
        for (name, event_names) in &events {
            let Some(operation) = Operation::parse(name) else {
                warn!(target: "docsearch::plugin", operation = %name, "Unknown operation, skipping");
                continue;
            };
            for event in event_names {
                hooks.on(event, operation_handler(operation, event, Arc::clone(&provider)));
                debug!(target: "docsearch::plugin", %operation, event = %event, "Bound operation");
                bound += 1;
            }
        }
        if bound == 0 {
            warn!(target: "docsearch::plugin", "No events bound");
        }

        info!(target: "docsearch::plugin", bound, "Search provider registered");
        Ok(provider)
    }
}
