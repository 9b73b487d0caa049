//! Error types for docsearch
//!
//! Errors fall into three classes with different propagation policies:
//! - [`ConfigError`]: configuration and wiring problems, fatal at registration
//! - [`FetchError`]: repository failures, logged and absorbed by the caller
//! - [`SearchError`]: caller precondition violations
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::time::Duration;
use thiserror::Error;

/// Configuration and integration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The plug-in's key is absent from the host configuration bag
    #[error("Config Error: '{key}' configuration key is missing")]
    MissingKey {
        /// Expected configuration key
        key: String,
    },

    /// A configuration field has the wrong shape
    #[error("Config Error: `{field}` should be {expected}")]
    InvalidField {
        /// Offending field name
        field: String,
        /// Description of the accepted shape
        expected: &'static str,
    },

    /// `events` was explicitly cleared
    #[error("Missing events to listen to for in 'config.events'")]
    MissingEvents,

    /// The host context carries no hook dispatcher
    #[error("Missing event dispatcher in 'context.hooks'")]
    MissingDispatcher,

    /// A locale code with no built-in extension
    #[error("Config Error: unknown locale '{code}'")]
    UnknownLocale {
        /// Requested locale code
        code: String,
    },

    /// The configuration could not be parsed
    #[error("Config Error: failed to parse configuration: {0}")]
    Parse(String),

    /// The configuration file could not be read
    #[error("Config Error: I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Repository fetch failures
///
/// Always recoverable: the index builder keeps its previous index and the
/// query executor returns an empty result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The repository reported a failure
    #[error("document source failed: {reason}")]
    Source {
        /// Failure description
        reason: String,
    },

    /// The repository answered with something other than a document list
    #[error("document source returned a malformed response: {reason}")]
    Malformed {
        /// What was wrong with the response
        reason: String,
    },

    /// The repository did not answer in time
    #[error("document fetch timed out after {after:?}")]
    Timeout {
        /// Elapsed bound
        after: Duration,
    },

    /// No hook handler answered the fetch event
    #[error("no handler answered '{event}'")]
    NoResponder {
        /// Event name that went unanswered
        event: String,
    },
}

impl FetchError {
    /// Shorthand for a source failure
    pub fn source(reason: impl Into<String>) -> Self {
        FetchError::Source {
            reason: reason.into(),
        }
    }

    /// Shorthand for a malformed response
    pub fn malformed(reason: impl Into<String>) -> Self {
        FetchError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Search precondition violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Searched before any index build succeeded
    #[error("search index has not been built")]
    IndexNotBuilt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_key() {
        let err = ConfigError::MissingKey {
            key: "search-provider".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("search-provider"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_error_display_invalid_field() {
        let err = ConfigError::InvalidField {
            field: "ignore_slugs".to_string(),
            expected: "an array",
        };
        assert_eq!(err.to_string(), "Config Error: `ignore_slugs` should be an array");
    }

    #[test]
    fn test_error_display_timeout() {
        let err = FetchError::Timeout {
            after: Duration::from_millis(250),
        };
        assert!(err.to_string().contains("250ms"));
    }

    #[test]
    fn test_error_from_toml() {
        let parse: Result<toml::Value, _> = toml::from_str("= broken");
        let err: ConfigError = parse.unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_fetch_error_helpers() {
        assert_eq!(
            FetchError::source("down"),
            FetchError::Source {
                reason: "down".to_string()
            }
        );
        assert!(FetchError::malformed("not a list").to_string().contains("not a list"));
    }

    #[test]
    fn test_search_error_display() {
        assert_eq!(
            SearchError::IndexNotBuilt.to_string(),
            "search index has not been built"
        );
    }
}
