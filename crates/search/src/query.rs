//! Query parsing
//!
//! A query is a whitespace-separated list of clauses:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `term` | optional: contributes to the score |
//! | `+term` | required: every result must match it |
//! | `-term` | prohibited: no result may match it |
//! | `field:term` | match only in the named field |
//! | `term*` | prefix wildcard |
//! | `term^10` | multiply this clause's score |
//!
//! Modifiers combine, e.g. `+tags:rust^5`.

use thiserror::Error;

/// Errors from parsing a query string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A field scope names a field the index does not have
    #[error("unknown field '{field}' in query")]
    UnknownField {
        /// Requested field
        field: String,
    },

    /// A boost that is not a finite, non-negative number
    #[error("invalid boost '{value}' in query")]
    InvalidBoost {
        /// Raw boost text
        value: String,
    },
}

/// Clause presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Contributes to the score if matched
    Optional,
    /// Must match
    Required,
    /// Must not match
    Prohibited,
}

/// One parsed query clause
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Raw clause text, modifiers removed
    pub text: String,
    /// Field scope, if any
    pub field: Option<String>,
    /// Presence modifier
    pub presence: Presence,
    /// Score multiplier
    pub boost: f32,
    /// Prefix match
    pub wildcard: bool,
}

/// Parse a query string into clauses.
///
/// `is_field` tells the parser which field scopes are valid. Clauses whose
/// text is empty after removing modifiers are dropped.
pub fn parse_query<F>(input: &str, is_field: F) -> Result<Vec<Clause>, QueryError>
where
    F: Fn(&str) -> bool,
{
    let mut clauses = Vec::new();
    for raw in input.split_whitespace() {
        if let Some(clause) = parse_clause(raw, &is_field)? {
            clauses.push(clause);
        }
    }
    Ok(clauses)
}

fn parse_clause<F>(raw: &str, is_field: &F) -> Result<Option<Clause>, QueryError>
where
    F: Fn(&str) -> bool,
{
    let (presence, rest) = if let Some(rest) = raw.strip_prefix('+') {
        (Presence::Required, rest)
    } else if let Some(rest) = raw.strip_prefix('-') {
        (Presence::Prohibited, rest)
    } else {
        (Presence::Optional, raw)
    };

    let (rest, boost) = match rest.rfind('^') {
        Some(pos) => {
            let value = &rest[pos + 1..];
            let boost: f32 = value.parse().map_err(|_| QueryError::InvalidBoost {
                value: value.to_string(),
            })?;
            if !boost.is_finite() || boost < 0.0 {
                return Err(QueryError::InvalidBoost {
                    value: value.to_string(),
                });
            }
            (&rest[..pos], boost)
        }
        None => (rest, 1.0),
    };

    let (field, rest) = match rest.find(':') {
        Some(pos) if pos > 0 => {
            let name = &rest[..pos];
            if !is_field(name) {
                return Err(QueryError::UnknownField {
                    field: name.to_string(),
                });
            }
            (Some(name.to_string()), &rest[pos + 1..])
        }
        _ => (None, rest),
    };

    let wildcard = rest.ends_with('*');
    let text = rest.trim_end_matches('*');
    if text.is_empty() {
        return Ok(None);
    }

    Ok(Some(Clause {
        text: text.to_string(),
        field,
        presence,
        boost,
        wildcard,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> bool {
        matches!(name, "title" | "content" | "tags")
    }

    #[test]
    fn test_plain_terms() {
        let clauses = parse_query("hello world", fields).unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].text, "hello");
        assert_eq!(clauses[0].presence, Presence::Optional);
        assert_eq!(clauses[0].boost, 1.0);
        assert!(clauses[0].field.is_none());
        assert!(!clauses[0].wildcard);
    }

    #[test]
    fn test_presence() {
        let clauses = parse_query("+must -never maybe", fields).unwrap();
        assert_eq!(clauses[0].presence, Presence::Required);
        assert_eq!(clauses[1].presence, Presence::Prohibited);
        assert_eq!(clauses[2].presence, Presence::Optional);
    }

    #[test]
    fn test_field_scope() {
        let clauses = parse_query("tags:rust", fields).unwrap();
        assert_eq!(clauses[0].field.as_deref(), Some("tags"));
        assert_eq!(clauses[0].text, "rust");
    }

    #[test]
    fn test_unknown_field() {
        let err = parse_query("author:me", fields).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownField {
                field: "author".to_string()
            }
        );
    }

    #[test]
    fn test_wildcard_and_boost() {
        let clauses = parse_query("+title:doc*^10", fields).unwrap();
        let clause = &clauses[0];
        assert_eq!(clause.presence, Presence::Required);
        assert_eq!(clause.field.as_deref(), Some("title"));
        assert_eq!(clause.text, "doc");
        assert!(clause.wildcard);
        assert_eq!(clause.boost, 10.0);
    }

    #[test]
    fn test_invalid_boost() {
        assert!(matches!(
            parse_query("term^high", fields),
            Err(QueryError::InvalidBoost { .. })
        ));
        assert!(matches!(
            parse_query("term^-2", fields),
            Err(QueryError::InvalidBoost { .. })
        ));
    }

    #[test]
    fn test_empty_clauses_dropped() {
        assert!(parse_query("", fields).unwrap().is_empty());
        assert!(parse_query("   + - *", fields).unwrap().is_empty());
    }

    #[test]
    fn test_leading_colon_is_text() {
        let clauses = parse_query(":weird", fields).unwrap();
        assert_eq!(clauses[0].text, ":weird");
        assert!(clauses[0].field.is_none());
    }
}
