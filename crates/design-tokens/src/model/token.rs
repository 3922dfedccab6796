//! The token envelope.

use crate::model::{GroupIdx, Id, PropertyValue, TokenKind, TokenRef, TokenValue, origin_key};

/// Provenance of a token imported from an external design tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Origin {
    /// Provenance id; its first segment is the layer-grouping key.
    pub id: Option<String>,
    pub name: Option<String>,
    pub source_id: Option<String>,
}

impl Origin {
    /// Returns the layer-grouping key, if the origin has a non-empty id.
    pub fn key(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(origin_key)
            .filter(|key| !key.is_empty())
    }
}

/// A resolved token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Persistent id.
    pub id: Id,
    /// Id of this revision of the record.
    pub versioned_id: Id,
    pub brand_id: Id,
    pub design_system_version_id: Id,
    /// Set only on theme replicas.
    pub theme_id: Option<Id>,
    pub kind: TokenKind,
    pub name: String,
    pub description: String,
    pub origin: Option<Origin>,
    /// Owning group; `None` when no group lists this token.
    pub parent: Option<GroupIdx>,
    /// Position inside the owning group, or the declaration index for
    /// tokens without a group.
    pub sort_order: usize,
    pub properties: Vec<PropertyValue>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub value: TokenValue,
    /// Ordered layer stack (shadow, gradient and blur only; empty otherwise).
    pub layers: Vec<TokenRef>,
    /// True for every layer of a stack except the first.
    pub is_virtual: bool,
}

impl Token {
    /// Returns the top-level alias target, if any.
    pub fn referenced_token(&self) -> Option<&TokenRef> {
        self.value.referenced_token()
    }

    /// Returns the layer-grouping key of this token's origin.
    pub fn origin_key(&self) -> Option<&str> {
        self.origin.as_ref().and_then(Origin::key)
    }

    /// Looks up a custom property value by its code name.
    pub fn property(&self, code_name: &str) -> Option<&PropertyValue> {
        self.properties.iter().find(|p| p.code_name == code_name)
    }

    /// Whether this token is a theme replica.
    pub fn is_replica(&self) -> bool {
        self.theme_id.is_some()
    }
}
