//! Fixed bounds used by the index builder and the query executor
//!
//! These values are part of the observable contract: the repository is never
//! asked for more than [`MAX_FETCH_LIMIT`] documents, and searches return at
//! most [`DEFAULT_SEARCH_LIMIT`] documents unless the caller asks otherwise.

/// Upper bound on documents requested from the repository per fetch.
pub const MAX_FETCH_LIMIT: usize = 10_000;

/// Result limit applied when a search request does not carry one.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Default bound on a single repository fetch, in milliseconds.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;
