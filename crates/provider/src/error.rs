//! Error types for the provider
//!
//! [`HookError`] is what a hook handler returns to the host dispatcher.
//! [`Error`] is what registration and provider construction return. Fetch
//! and query failures never reach a caller; they are logged and absorbed.

use docsearch_core::{ConfigError, SearchError};
use docsearch_search::LocaleError;
use thiserror::Error;

/// Errors returned by hook handlers and dispatchers
#[derive(Debug, Error)]
pub enum HookError {
    /// The event payload could not be read
    #[error("invalid payload for '{event}': {reason}")]
    InvalidPayload {
        /// Event being handled
        event: String,
        /// What was wrong with the payload
        reason: String,
    },

    /// Configuration rejected by the validator
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Search precondition violation
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Any other handler failure
    #[error("hook handler failed: {0}")]
    Handler(String),
}

impl HookError {
    /// Shorthand for a payload error
    pub fn invalid_payload(event: impl Into<String>, reason: impl Into<String>) -> Self {
        HookError::InvalidPayload {
            event: event.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level provider error
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or wiring error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Locale extension error
    #[error(transparent)]
    Locale(#[from] LocaleError),
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;
