//! Immutable field-weighted inverted index
//!
//! This module provides:
//! - FieldSchema: which document fields are indexed and their boosts
//! - PostingEntry / PostingList: per-term document occurrences
//! - InvertedIndex: built once from a document snapshot, then read-only
//!
//! # Architectural Rules
//!
//! - The index stores integer doc IDs and the reference key only, never
//!   document content. Callers re-fetch documents by reference.
//! - There is no add/remove: a changed corpus means a new index.
//!
//! # Scoring
//!
//! Each field is scored with BM25 against its own statistics, then
//! multiplied by the field boost and the clause boost:
//!
//! score += boost_f * boost_c * IDF_f(t) * (tf * (k1 + 1)) / (tf + k1 * (1 - b + b * dl/avgdl))
//!
//! Equal scores keep insertion order, so a title-ordered snapshot yields
//! title-ordered ties.

use crate::analyzer::Analyzer;
use crate::engine::{Bm25Params, IndexHandle, ScoredRef};
use crate::query::{parse_query, Clause, Presence, QueryError};
use docsearch_core::Document;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Boost applied to the tags field by the default schema.
pub const TAG_BOOST: f32 = 100.0;

// ============================================================================
// FieldSchema
// ============================================================================

/// An indexed field and its relevance weight
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Document field name
    pub name: String,
    /// Score multiplier
    pub boost: f32,
}

/// Indexed fields plus the field used as the reference key
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Field whose value identifies a document in query results
    pub reference: String,
    /// Indexed fields, in declaration order
    pub fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Schema with a reference field and no indexed fields
    pub fn new(reference: impl Into<String>) -> Self {
        FieldSchema {
            reference: reference.into(),
            fields: Vec::new(),
        }
    }

    /// Builder: add an indexed field
    pub fn field(mut self, name: impl Into<String>, boost: f32) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            boost,
        });
        self
    }

    /// `title` and `content` at weight 1, `tags` at [`TAG_BOOST`], keyed by `slug`
    pub fn document_default() -> Self {
        FieldSchema::new("slug")
            .field("title", 1.0)
            .field("content", 1.0)
            .field("tags", TAG_BOOST)
    }

    /// Is `name` an indexed field?
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::document_default()
    }
}

// ============================================================================
// PostingList
// ============================================================================

/// Entry in a posting list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingEntry {
    /// Integer document identifier (insertion position)
    pub doc_id: u32,
    /// Term frequency in this document's field
    pub tf: u32,
}

/// List of documents containing a term, in doc_id order
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    /// Document entries
    pub entries: Vec<PostingEntry>,
}

impl PostingList {
    /// Number of documents containing this term
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if posting list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// FieldIndex
// ============================================================================

#[derive(Debug)]
struct FieldIndex {
    name: String,
    boost: f32,
    /// Sorted vocabulary; enables prefix scans for wildcard clauses
    postings: BTreeMap<String, PostingList>,
    /// Field length in tokens, by doc_id
    doc_lens: Vec<u32>,
    avg_len: f32,
}

impl FieldIndex {
    fn new(field: &FieldSpec) -> Self {
        FieldIndex {
            name: field.name.clone(),
            boost: field.boost,
            postings: BTreeMap::new(),
            doc_lens: Vec::new(),
            avg_len: 0.0,
        }
    }

    fn add(&mut self, doc_id: u32, tokens: Vec<String>) {
        self.doc_lens.push(tokens.len() as u32);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        for (term, tf) in counts {
            self.postings
                .entry(term)
                .or_default()
                .entries
                .push(PostingEntry { doc_id, tf });
        }
    }

    fn finish(&mut self) {
        let total: u64 = self.doc_lens.iter().map(|&l| u64::from(l)).sum();
        self.avg_len = if self.doc_lens.is_empty() {
            0.0
        } else {
            total as f32 / self.doc_lens.len() as f32
        };
    }

    /// Posting lists matching a term, exactly or by prefix
    fn matching<'a>(&'a self, term: &'a str, prefix: bool) -> Vec<&'a PostingList> {
        if prefix {
            self.postings
                .range::<str, _>((std::ops::Bound::Included(term), std::ops::Bound::Unbounded))
                .take_while(|(t, _)| t.starts_with(term))
                .map(|(_, list)| list)
                .collect()
        } else {
            self.postings.get(term).into_iter().collect()
        }
    }
}

// ============================================================================
// InvertedIndex
// ============================================================================

/// Immutable inverted index over a document snapshot
///
/// # Thread Safety
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct InvertedIndex {
    /// doc_id -> reference
    refs: Vec<String>,
    fields: Vec<FieldIndex>,
    analyzer: Arc<Analyzer>,
    params: Bm25Params,
}

/// A clause after analysis: one term in one presence class
struct TermClause<'a> {
    term: String,
    field: Option<&'a str>,
    presence: Presence,
    boost: f32,
    prefix: bool,
}

impl InvertedIndex {
    /// Build an index over `documents`.
    ///
    /// Documents without a reference value are skipped; a repeated reference
    /// keeps its first occurrence.
    pub fn build(
        documents: &[Document],
        schema: &FieldSchema,
        analyzer: Arc<Analyzer>,
        params: Bm25Params,
    ) -> Self {
        let mut fields: Vec<FieldIndex> = schema.fields.iter().map(FieldIndex::new).collect();
        let mut refs: Vec<String> = Vec::with_capacity(documents.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(documents.len());

        for document in documents {
            let reference = match document.field_text(&schema.reference) {
                Some(r) if !r.is_empty() => r.into_owned(),
                _ => {
                    debug!(target: "docsearch::index", "Skipping document without reference");
                    continue;
                }
            };
            if !seen.insert(reference.clone()) {
                debug!(target: "docsearch::index", reference = %reference, "Skipping duplicate reference");
                continue;
            }

            let doc_id = refs.len() as u32;
            for field in fields.iter_mut() {
                let tokens = document
                    .field_text(&field.name)
                    .map(|text| analyzer.analyze(&text))
                    .unwrap_or_default();
                field.add(doc_id, tokens);
            }
            debug!(target: "docsearch::index", reference = %reference, "Indexing");
            refs.push(reference);
        }

        for field in fields.iter_mut() {
            field.finish();
        }

        InvertedIndex {
            refs,
            fields,
            analyzer,
            params,
        }
    }

    /// Get total number of indexed documents
    pub fn total_docs(&self) -> usize {
        self.refs.len()
    }

    /// Get document frequency for an analyzed term in a field
    pub fn doc_freq(&self, field: &str, term: &str) -> usize {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .and_then(|f| f.postings.get(term))
            .map_or(0, PostingList::len)
    }

    /// Indexed references, in insertion order
    pub fn references(&self) -> &[String] {
        &self.refs
    }

    /// Compute IDF for a document frequency
    ///
    /// Uses standard IDF formula with smoothing:
    /// IDF(t) = ln((N - df + 0.5) / (df + 0.5) + 1)
    fn idf(&self, df: usize) -> f32 {
        let n = self.refs.len() as f32;
        let df = df as f32;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    fn analyze_clauses<'a>(&self, clauses: &'a [Clause]) -> Vec<TermClause<'a>> {
        let mut terms = Vec::new();
        for clause in clauses {
            let analyzed = if clause.wildcard {
                let prefix = self.analyzer.normalize_prefix(&clause.text);
                if prefix.is_empty() {
                    Vec::new()
                } else {
                    vec![prefix]
                }
            } else {
                self.analyzer.analyze(&clause.text)
            };
            for term in analyzed {
                terms.push(TermClause {
                    term,
                    field: clause.field.as_deref(),
                    presence: clause.presence,
                    boost: clause.boost,
                    prefix: clause.wildcard,
                });
            }
        }
        terms
    }

    /// Score a parsed query.
    ///
    /// A result must match every required clause, no prohibited clause and,
    /// when the query has optional clauses but no required ones, at least
    /// one optional clause. A query of only prohibited clauses returns every
    /// document that avoids them, with a zero score.
    pub fn score(&self, clauses: &[Clause]) -> Vec<ScoredRef> {
        let num_docs = self.refs.len();
        let terms = self.analyze_clauses(clauses);
        if num_docs == 0 || terms.is_empty() {
            return Vec::new();
        }

        let mut scores = vec![0.0f32; num_docs];
        let mut matched = vec![false; num_docs];
        let mut prohibited = vec![false; num_docs];
        let mut required_hits = vec![0u32; num_docs];
        // Last clause index (+1) that touched each doc, so a required clause
        // matching in several fields counts once
        let mut stamp = vec![0usize; num_docs];
        let mut required_total = 0u32;
        let mut positive_clauses = 0usize;

        let k1 = self.params.k1;
        let b = self.params.b;

        for (i, clause) in terms.iter().enumerate() {
            match clause.presence {
                Presence::Required => {
                    required_total += 1;
                    positive_clauses += 1;
                }
                Presence::Optional => positive_clauses += 1,
                Presence::Prohibited => {}
            }

            for field in &self.fields {
                if clause.field.map_or(false, |f| f != field.name) {
                    continue;
                }
                let avg_len = if field.avg_len > 0.0 { field.avg_len } else { 1.0 };
                for list in field.matching(&clause.term, clause.prefix) {
                    let idf = self.idf(list.len());
                    for entry in &list.entries {
                        let did = entry.doc_id as usize;
                        if clause.presence == Presence::Prohibited {
                            prohibited[did] = true;
                            continue;
                        }
                        let tf = entry.tf as f32;
                        let dl = field.doc_lens[did] as f32;
                        let tf_component =
                            (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * dl / avg_len));
                        scores[did] += field.boost * clause.boost * idf * tf_component;
                        matched[did] = true;
                        if stamp[did] != i + 1 {
                            stamp[did] = i + 1;
                            if clause.presence == Presence::Required {
                                required_hits[did] += 1;
                            }
                        }
                    }
                }
            }
        }

        let only_prohibited = positive_clauses == 0;
        let mut results: Vec<(usize, f32)> = (0..num_docs)
            .filter(|&d| !prohibited[d])
            .filter(|&d| only_prohibited || (matched[d] && required_hits[d] == required_total))
            .map(|d| (d, scores[d]))
            .collect();

        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        results
            .into_iter()
            .map(|(d, score)| ScoredRef {
                reference: self.refs[d].clone(),
                score,
            })
            .collect()
    }
}

impl IndexHandle for InvertedIndex {
    fn query(&self, text: &str) -> Result<Vec<ScoredRef>, QueryError> {
        let clauses = parse_query(text, |name| self.fields.iter().any(|f| f.name == name))?;
        Ok(self.score(&clauses))
    }

    fn len(&self) -> usize {
        self.refs.len()
    }

    fn contains(&self, reference: &str) -> bool {
        self.refs.iter().any(|r| r == reference)
    }
}
