//! Document record owned by the host repository
//!
//! The search layer only ever reads snapshots of documents. The serialized
//! form uses the host's camelCase field names, with dates encoded as epoch
//! milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A repository document.
///
/// `slug` is the unique identifier and doubles as the index reference key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier
    #[serde(default)]
    pub slug: String,

    /// Display title; also the repository sort key
    #[serde(default)]
    pub title: String,

    /// Body text (typically Markdown)
    #[serde(default)]
    pub content: String,

    /// Ordered tag list
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation time
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_date: Option<DateTime<Utc>>,

    /// Last update time
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_date: Option<DateTime<Utc>>,

    /// Opaque host metadata, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<serde_json::Value>,
}

impl Document {
    /// Create a document with a slug and title
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Document {
            slug: slug.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder: set content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder: set tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set creation and update time
    pub fn with_dates(mut self, created: DateTime<Utc>, updated: DateTime<Utc>) -> Self {
        self.create_date = Some(created);
        self.update_date = Some(updated);
        self
    }

    /// Builder: set custom data
    pub fn with_custom_data(mut self, data: serde_json::Value) -> Self {
        self.custom_data = Some(data);
        self
    }

    /// Text of a named field, as seen by the indexer.
    ///
    /// Tags are joined with single spaces. Returns `None` for fields the
    /// document does not have.
    pub fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "slug" => Some(Cow::Borrowed(self.slug.as_str())),
            "title" => Some(Cow::Borrowed(self.title.as_str())),
            "content" => Some(Cow::Borrowed(self.content.as_str())),
            "tags" => Some(Cow::Owned(self.tags.join(" "))),
            _ => None,
        }
    }

    /// Copy holding only the named fields; everything else is defaulted.
    ///
    /// `slug` is always kept so the projection stays addressable.
    pub fn project(&self, fields: &[String]) -> Document {
        let keep = |name: &str| fields.iter().any(|f| f == name);
        Document {
            slug: self.slug.clone(),
            title: if keep("title") { self.title.clone() } else { String::new() },
            content: if keep("content") { self.content.clone() } else { String::new() },
            tags: if keep("tags") { self.tags.clone() } else { Vec::new() },
            create_date: if keep("createDate") { self.create_date } else { None },
            update_date: if keep("updateDate") { self.update_date } else { None },
            custom_data: if keep("customData") { self.custom_data.clone() } else { None },
        }
    }
}
