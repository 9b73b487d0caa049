//! Host hook dispatch
//!
//! The host owns an event dispatcher: handlers are registered under an event
//! name with [`Hooks::on`], and [`Hooks::fetch`] runs every handler for an
//! event and collects their return values. Payloads and results are JSON.
//!
//! [`EventDispatcher`] is an in-process implementation for hosts that do not
//! bring their own, and for tests.

use crate::error::HookError;
use dashmap::DashMap;
use docsearch_core::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Type alias for a thread-safe, asynchronous hook handler.
pub type HookHandler =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, HookError>> + Send + Sync>;

/// Wrap an async closure as a [`HookHandler`]
pub fn handler<F, Fut>(f: F) -> HookHandler
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, HookError>> + Send + 'static,
{
    Arc::new(move |payload: Value| Box::pin(f(payload)) as BoxFuture<'static, _>)
}

/// Host event dispatcher capability
pub trait Hooks: Send + Sync {
    /// Register a handler for an event
    fn on(&self, event: &str, handler: HookHandler);

    /// Run every handler registered for `event`, in registration order, and
    /// collect their results. No handler yields an empty list.
    fn fetch<'a>(&'a self, event: &'a str, payload: Value)
        -> BoxFuture<'a, Result<Vec<Value>, HookError>>;

    /// Run every handler for `event` and discard the results
    fn dispatch<'a>(&'a self, event: &'a str, payload: Value) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if let Err(e) = self.fetch(event, payload).await {
                warn!(target: "docsearch::hooks", event, error = %e, "Hook dispatch failed");
            }
        })
    }
}

/// In-process event dispatcher
#[derive(Default)]
pub struct EventDispatcher {
    handlers: DashMap<String, Vec<HookHandler>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("events", &self.events())
            .finish()
    }
}

impl EventDispatcher {
    /// Create a new, empty dispatcher
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Event names with at least one handler, sorted
    pub fn events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        events.sort();
        events
    }

    /// Number of handlers registered for an event
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, |h| h.len())
    }
}

impl Hooks for EventDispatcher {
    fn on(&self, event: &str, handler: HookHandler) {
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push(handler);
        debug!(target: "docsearch::hooks", event, "Registered hook handler");
    }

    fn fetch<'a>(
        &'a self,
        event: &'a str,
        payload: Value,
    ) -> BoxFuture<'a, Result<Vec<Value>, HookError>> {
        // Clone the handler list so no shard lock is held across an await
        let handlers: Vec<HookHandler> = self
            .handlers
            .get(event)
            .map(|h| h.value().clone())
            .unwrap_or_default();

        Box::pin(async move {
            debug!(target: "docsearch::hooks", event, handlers = handlers.len(), "Dispatching");
            let mut results = Vec::with_capacity(handlers.len());
            for handler in handlers {
                results.push(handler(payload.clone()).await?);
            }
            Ok(results)
        })
    }
}

/// What the host hands the plug-in at registration
#[derive(Clone, Default)]
pub struct Context {
    /// Host configuration bag
    pub config: Value,
    /// Host dispatcher
    pub hooks: Option<Arc<dyn Hooks>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

impl Context {
    /// Context with a configuration bag and a dispatcher
    pub fn new(config: Value, hooks: Arc<dyn Hooks>) -> Self {
        Context {
            config,
            hooks: Some(hooks),
        }
    }
}
