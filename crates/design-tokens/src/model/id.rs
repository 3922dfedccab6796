//! Identifiers and arena handles.
//!
//! Tokens and groups are keyed by their persistent id, a string that stays
//! stable across design-system versions. Inside a resolved graph, links
//! between objects are arena handles rather than owning pointers.

use std::fmt;
use std::sync::Arc;

/// A persistent identifier (token, group, brand, theme, property).
///
/// Every alias, group child list and theme override refers to tokens by this
/// id, never by the versioned record id.
pub type Id = Arc<str>;

/// Separator between segments of an origin id.
pub const ORIGIN_SEGMENT_SEPARATOR: char = ',';

/// Handle of a token inside a token arena (base graph or theme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenIdx(u32);

impl TokenIdx {
    pub(crate) fn new(index: usize) -> Self {
        TokenIdx(index as u32)
    }

    /// Returns the position of the token in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a group inside a [`GroupForest`](crate::model::GroupForest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupIdx(u32);

impl GroupIdx {
    pub(crate) fn new(index: usize) -> Self {
        GroupIdx(index as u32)
    }

    /// Returns the position of the group in forest pre-order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which arena a [`TokenRef`] points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefScope {
    /// The base [`TokenGraph`](crate::TokenGraph).
    Base,
    /// The replicas of the [`ResolvedTheme`](crate::ResolvedTheme) holding the value.
    Theme,
}

/// A live link to another token.
///
/// Carries the persistent id of the target (used for structural comparison)
/// and the arena handle used for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenRef {
    pub id: Id,
    pub target: TokenIdx,
    pub scope: RefScope,
}

impl TokenRef {
    /// Creates a link into the base graph.
    pub fn base(id: Id, target: TokenIdx) -> Self {
        TokenRef {
            id,
            target,
            scope: RefScope::Base,
        }
    }

    /// Creates a link into the replicas of the current theme.
    pub fn theme(id: Id, target: TokenIdx) -> Self {
        TokenRef {
            id,
            target,
            scope: RefScope::Theme,
        }
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            RefScope::Base => write!(f, "{{{}}}", self.id),
            RefScope::Theme => write!(f, "{{theme:{}}}", self.id),
        }
    }
}

/// Returns the layer-grouping key of an origin id: its first segment.
///
/// ```text
/// "S:abc123,1" -> "S:abc123"
/// ```
pub fn origin_key(origin_id: &str) -> &str {
    origin_id
        .split(ORIGIN_SEGMENT_SEPARATOR)
        .next()
        .unwrap_or(origin_id)
        .trim()
}
