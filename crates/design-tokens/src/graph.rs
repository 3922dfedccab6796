//! Resolved graphs and their read accessors.

use std::collections::HashMap;

use crate::model::{
    GroupForest, Id, PropertyDefinition, RefScope, Token, TokenIdx, TokenKind, TokenRef,
    TokenValue,
};

/// The fully linked token graph of one design-system version.
///
/// Tokens are stored in raw declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGraph {
    pub(crate) tokens: Vec<Token>,
    pub(crate) by_id: HashMap<Id, TokenIdx>,
    pub(crate) forest: GroupForest,
    pub(crate) properties: Vec<PropertyDefinition>,
}

impl TokenGraph {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Looks up a token by persistent id.
    pub fn token(&self, id: &str) -> Option<&Token> {
        self.by_id.get(id).map(|idx| &self.tokens[idx.index()])
    }

    pub fn index_of(&self, id: &str) -> Option<TokenIdx> {
        self.by_id.get(id).copied()
    }

    pub fn token_at(&self, idx: TokenIdx) -> &Token {
        &self.tokens[idx.index()]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn groups(&self) -> &GroupForest {
        &self.forest
    }

    pub fn property_definitions(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    pub fn tokens_of_kind(&self, kind: TokenKind) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |t| t.kind == kind)
    }

    pub fn tokens_in_brand<'a>(&'a self, brand_id: &'a str) -> impl Iterator<Item = &'a Token> {
        self.tokens.iter().filter(move |t| &*t.brand_id == brand_id)
    }

    /// Tokens owned by a group, in the group's declared order.
    pub fn tokens_in_group(&self, group_id: &str) -> Vec<&Token> {
        let Some(group_idx) = self.forest.index_of(group_id) else {
            return Vec::new();
        };
        self.forest
            .group_at(group_idx)
            .token_ids
            .iter()
            .filter_map(|id| self.token(id))
            .filter(|t| t.parent == Some(group_idx))
            .collect()
    }

    /// Follows a link into the base graph.
    ///
    /// Returns `None` for links into a theme; use [`ResolvedTheme::follow`].
    pub fn follow(&self, link: &TokenRef) -> Option<&Token> {
        match link.scope {
            RefScope::Base => self.tokens.get(link.target.index()),
            RefScope::Theme => None,
        }
    }

    /// Follows top-level aliases until a literal value is reached.
    pub fn literal_value(&self, idx: TokenIdx) -> &TokenValue {
        let mut token = &self.tokens[idx.index()];
        // Chains are acyclic and bounded once resolution succeeded.
        while let Some(next) = token.referenced_token().and_then(|r| self.follow(r)) {
            token = next;
        }
        &token.value
    }

    /// The layer stack of a shadow, gradient or blur token.
    pub fn layers(&self, idx: TokenIdx) -> Vec<&Token> {
        self.tokens[idx.index()]
            .layers
            .iter()
            .filter_map(|link| self.follow(link))
            .collect()
    }
}

/// The sparse override set of one theme.
///
/// Holds replicas only for overridden tokens; everything else falls back to
/// the base graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub id: Id,
    pub brand_id: Id,
    pub name: String,
    pub description: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) by_id: HashMap<Id, TokenIdx>,
}

impl ResolvedTheme {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The replica of a token, if this theme overrides it.
    pub fn get(&self, id: &str) -> Option<&Token> {
        self.by_id.get(id).map(|idx| &self.tokens[idx.index()])
    }

    pub fn overrides(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Replicas in override declaration order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The replica if overridden, else the base token.
    pub fn token_or_base<'a>(&'a self, base: &'a TokenGraph, id: &str) -> Option<&'a Token> {
        self.get(id).or_else(|| base.token(id))
    }

    /// Follows a link held by a replica (into this theme or the base graph).
    pub fn follow<'a>(&'a self, base: &'a TokenGraph, link: &TokenRef) -> Option<&'a Token> {
        match link.scope {
            RefScope::Base => base.follow(link),
            RefScope::Theme => self.tokens.get(link.target.index()),
        }
    }
}

/// A resolved design system: the base graph plus every theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDesignSystem {
    pub graph: TokenGraph,
    pub themes: Vec<ResolvedTheme>,
}

impl ResolvedDesignSystem {
    pub fn theme(&self, id: &str) -> Option<&ResolvedTheme> {
        self.themes.iter().find(|t| &*t.id == id)
    }
}
