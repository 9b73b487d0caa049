//! Structured fetch descriptor sent to the document repository
//!
//! Two shapes are ever issued:
//! - **snapshot**: every indexable document, used by the index builder
//! - **projection**: full documents for a set of ranked slugs, used by the
//!   query executor
//!
//! Both exclude ignored slugs, order by title ascending and are capped at
//! [`MAX_FETCH_LIMIT`]. The `Display` form is the query string understood by
//! string-based storage hosts:
//!
//! ```text
//! SELECT 'slug', 'title', 'tags', 'content' FROM documents WHERE slug NOT_IN ("a", "b") ORDER BY title ASC LIMIT 10000
//! ```

use crate::document::Document;
use crate::limits::MAX_FETCH_LIMIT;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Fields requested by the index builder.
pub const INDEXED_FIELDS: [&str; 4] = ["slug", "title", "tags", "content"];

/// Which document fields the repository should return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSelection {
    /// Every field (`SELECT *`)
    All,
    /// Only the named fields
    Only(Vec<String>),
}

/// Sort direction for the title ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// A to Z
    Asc,
    /// Z to A
    Desc,
}

/// A fetch request against the conceptual `documents` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentQuery {
    /// Field selection
    pub fields: FieldSelection,
    /// Slugs that must not be returned
    pub exclude_slugs: Vec<String>,
    /// When set, only these slugs may be returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_slugs: Option<Vec<String>>,
    /// Title ordering
    pub order: SortDirection,
    /// Maximum documents to return
    pub limit: usize,
}

impl DocumentQuery {
    /// Snapshot of every indexable document
    pub fn snapshot<I, S>(ignore_slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DocumentQuery {
            fields: FieldSelection::Only(INDEXED_FIELDS.iter().map(|f| f.to_string()).collect()),
            exclude_slugs: ignore_slugs.into_iter().map(Into::into).collect(),
            include_slugs: None,
            order: SortDirection::Asc,
            limit: MAX_FETCH_LIMIT,
        }
    }

    /// Full documents for the given ranked slugs
    pub fn projection<I, S, J, T>(ignore_slugs: I, slugs: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        DocumentQuery {
            fields: FieldSelection::All,
            exclude_slugs: ignore_slugs.into_iter().map(Into::into).collect(),
            include_slugs: Some(slugs.into_iter().map(Into::into).collect()),
            order: SortDirection::Asc,
            limit: MAX_FETCH_LIMIT,
        }
    }

    /// Does the document pass the slug filters?
    pub fn matches(&self, document: &Document) -> bool {
        if self.exclude_slugs.iter().any(|s| s == &document.slug) {
            return false;
        }
        match &self.include_slugs {
            Some(include) => include.iter().any(|s| s == &document.slug),
            None => true,
        }
    }

    /// Evaluate the query over an in-memory collection.
    ///
    /// Filters, orders by title (stable, so equal titles keep input order),
    /// truncates to the limit and projects the selected fields.
    pub fn apply<I>(&self, documents: I) -> Vec<Document>
    where
        I: IntoIterator<Item = Document>,
    {
        let excluded: HashSet<&str> = self.exclude_slugs.iter().map(String::as_str).collect();
        let included: Option<HashSet<&str>> = self
            .include_slugs
            .as_ref()
            .map(|s| s.iter().map(String::as_str).collect());

        let mut selected: Vec<Document> = documents
            .into_iter()
            .filter(|d| !excluded.contains(d.slug.as_str()))
            .filter(|d| included.as_ref().map_or(true, |inc| inc.contains(d.slug.as_str())))
            .collect();

        match self.order {
            SortDirection::Asc => selected.sort_by(|a, b| a.title.cmp(&b.title)),
            SortDirection::Desc => selected.sort_by(|a, b| b.title.cmp(&a.title)),
        }
        selected.truncate(self.limit);

        match &self.fields {
            FieldSelection::All => selected,
            FieldSelection::Only(fields) => selected.iter().map(|d| d.project(fields)).collect(),
        }
    }
}

fn write_quoted_list(f: &mut fmt::Formatter<'_>, values: &[String]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "\"{}\"", value.replace('"', "\\\""))?;
    }
    Ok(())
}

impl fmt::Display for DocumentQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        match &self.fields {
            FieldSelection::All => f.write_str("*")?,
            FieldSelection::Only(fields) => {
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{}'", field)?;
                }
            }
        }
        f.write_str(" FROM documents WHERE slug NOT_IN (")?;
        write_quoted_list(f, &self.exclude_slugs)?;
        f.write_str(")")?;
        if let Some(include) = &self.include_slugs {
            f.write_str(" AND slug IN (")?;
            write_quoted_list(f, include)?;
            f.write_str(")")?;
        }
        let direction = match self.order {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        write!(f, " ORDER BY title {} LIMIT {}", direction, self.limit)
    }
}
