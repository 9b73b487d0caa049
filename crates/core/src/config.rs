//! Plug-in configuration and validation
//!
//! The host hands the plug-in a JSON configuration bag; this plug-in's
//! settings live under [`CONFIG_KEY`]. Missing fields fall back to the
//! defaults, so a host only spells out what it changes.
//!
//! The same settings can be kept in a TOML file:
//!
//! ```toml
//! # Slugs never indexed nor returned
//! ignore_slugs = ["drafts", "private-notes"]
//!
//! # Built-in language support: "en", "fr", "de", "es"
//! locales = ["fr"]
//!
//! # Bound on a single repository fetch
//! fetch_timeout_ms = 30000
//!
//! [events]
//! search = ["search-query"]
//! build_index = ["search-rebuild"]
//! ```

use crate::error::ConfigError;
use crate::limits::DEFAULT_FETCH_TIMEOUT_MS;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Key under which the host configuration bag carries this plug-in's settings.
pub const CONFIG_KEY: &str = "search-provider";

/// Operation name → event names wiring table
pub type EventTable = BTreeMap<String, Vec<String>>;

/// The default wiring table.
pub fn default_events() -> EventTable {
    let entries: [(&str, &[&str]); 7] = [
        ("search", &["search-query"]),
        ("build_index", &["search-rebuild"]),
        ("index_add", &["search-add"]),
        ("index_update", &["search-update"]),
        ("index_remove", &["search-remove"]),
        ("get_popular_search_terms", &["popular-search-terms"]),
        ("validate_config", &["validate-config"]),
    ];
    entries
        .iter()
        .map(|(op, events)| {
            (
                op.to_string(),
                events.iter().map(|e| e.to_string()).collect(),
            )
        })
        .collect()
}

fn default_events_opt() -> Option<EventTable> {
    Some(default_events())
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

fn null_as_default_timeout<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(DEFAULT_FETCH_TIMEOUT_MS))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Plug-in settings.
///
/// `events` is `None` only when the host explicitly cleared it, which the
/// registrar rejects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Slugs excluded from indexing and from search results
    #[serde(default, deserialize_with = "null_as_default")]
    pub ignore_slugs: Vec<String>,
    /// Built-in locale codes to load before the first build
    #[serde(default, deserialize_with = "null_as_default")]
    pub locales: Vec<String>,
    /// Operation name → event names
    #[serde(default = "default_events_opt")]
    pub events: Option<EventTable>,
    /// Bound on a single repository fetch, in milliseconds
    #[serde(
        default = "default_fetch_timeout_ms",
        deserialize_with = "null_as_default_timeout"
    )]
    pub fetch_timeout_ms: u64,
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            ignore_slugs: Vec::new(),
            locales: Vec::new(),
            events: Some(default_events()),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl PluginConfig {
    /// Settings from a host configuration bag.
    ///
    /// Fields present under [`CONFIG_KEY`] override the defaults; an absent
    /// key yields the defaults. Malformed fields are reported the same way
    /// [`validate_config`] reports them.
    pub fn from_context_bag(bag: &Value) -> Result<Self, ConfigError> {
        match bag.get(CONFIG_KEY) {
            None | Some(Value::Null) => Ok(PluginConfig::default()),
            Some(section) => {
                check_section(section)?;
                Ok(serde_json::from_value(section.clone())?)
            }
        }
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(target: "docsearch::config", path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Fetch bound as a `Duration`
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Validate the shape of a host configuration bag.
///
/// A `null` bag carries nothing to validate and is accepted. Otherwise the
/// bag must contain [`CONFIG_KEY`], and any of `ignore_slugs`, `locales`,
/// `events` and `fetch_timeout_ms` that are present must have the right
/// shape. Does not mutate anything.
pub fn validate_config(bag: &Value) -> Result<(), ConfigError> {
    debug!(target: "docsearch::config", "Validating config...");
    if bag.is_null() {
        return Ok(());
    }
    let section = match bag.get(CONFIG_KEY) {
        Some(section) if !section.is_null() => section,
        _ => {
            let err = ConfigError::MissingKey {
                key: CONFIG_KEY.to_string(),
            };
            debug!(target: "docsearch::config", error = %err, "Config rejected");
            return Err(err);
        }
    };
    check_section(section).map_err(|err| {
        debug!(target: "docsearch::config", error = %err, "Config rejected");
        err
    })?;
    debug!(target: "docsearch::config", "Validated config.");
    Ok(())
}

fn invalid(field: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.to_string(),
        expected,
    }
}

fn is_string_array(value: &Value) -> bool {
    value
        .as_array()
        .map_or(false, |items| items.iter().all(Value::is_string))
}

fn check_section(section: &Value) -> Result<(), ConfigError> {
    let fields = section
        .as_object()
        .ok_or_else(|| invalid(CONFIG_KEY, "an object"))?;

    for name in ["ignore_slugs", "locales"] {
        match fields.get(name) {
            None | Some(Value::Null) => {}
            Some(value) if is_string_array(value) => {}
            Some(_) => return Err(invalid(name, "an array of strings")),
        }
    }

    match fields.get("events") {
        None | Some(Value::Null) => {}
        Some(Value::Object(table)) => {
            if !table.values().all(is_string_array) {
                return Err(invalid("events", "a map of event name arrays"));
            }
        }
        Some(_) => return Err(invalid("events", "a map of event name arrays")),
    }

    match fields.get("fetch_timeout_ms") {
        None | Some(Value::Null) => {}
        Some(value) if value.is_u64() => {}
        Some(_) => return Err(invalid("fetch_timeout_ms", "a non-negative integer")),
    }

    Ok(())
}
