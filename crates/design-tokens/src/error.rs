//! Error types for resolution.

use thiserror::Error;

use crate::model::{Id, TokenKind};

/// Errors that abort a resolution call.
///
/// Every variant points at inconsistent persisted data; none is retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error("{from} references {target}, which does not exist")]
    DanglingReference { from: Id, target: Id },

    #[error("cyclic alias: {}", format_chain(.chain))]
    CyclicReference { chain: Vec<Id> },

    #[error("alias chain starting at {id} exceeds {max} links")]
    AliasChainTooDeep { id: Id, max: usize },

    #[error("override of {token} in theme {theme} is malformed: {reason}")]
    MalformedOverride {
        theme: Id,
        token: Id,
        reason: &'static str,
    },

    #[error("{id} declares unsupported kind {kind:?}")]
    UnsupportedKind { id: Id, kind: String },

    #[error("{from} expects a {expected} token but {target} is {found}")]
    KindMismatch {
        from: Id,
        target: Id,
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("{id} has neither a value nor an alias")]
    MissingValue { id: Id },

    #[error("{id}: invalid {field}: {reason}")]
    InvalidValue {
        id: Id,
        field: &'static str,
        reason: String,
    },

    #[error("duplicate {what} id {id}")]
    DuplicateId { what: &'static str, id: Id },

    #[error("{field} length {len} exceeds limit {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

fn format_chain(chain: &[Id]) -> String {
    chain
        .iter()
        .map(|id| id.as_ref())
        .collect::<Vec<_>>()
        .join(" -> ")
}
