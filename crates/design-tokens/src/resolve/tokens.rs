//! Reference resolution for base tokens.
//!
//! Raw tokens may alias tokens declared anywhere in the input, so a single
//! linear pass cannot guarantee an alias target exists. Resolution runs in
//! four phases:
//!
//! 1. pure literal tokens
//! 2. pure aliased tokens (recursive, memoized)
//! 3. compound literal tokens (nested aliases link to already built pure tokens)
//! 4. compound aliased tokens (recursive, memoized)
//!
//! Every token's arena slot is its raw declaration index, so links can be
//! created before their target is materialized. Aliases are kept as links;
//! chains are never flattened.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::codec::{LinkResolver, RawPropertyDefinition, RawToken, decode_literal};
use crate::error::ResolveError;
use crate::graph::TokenGraph;
use crate::limits::ResolveOptions;
use crate::model::{GroupForest, GroupIdx, Id, Token, TokenIdx, TokenKind, TokenRef, TokenValue};

use super::layers::link_layers;
use super::origin_from_raw;
use super::properties::PropertyCatalog;

/// One raw token with its parsed identity.
struct Entry<'a> {
    raw: &'a RawToken,
    id: Id,
    kind: TokenKind,
}

impl Entry<'_> {
    fn is_aliased(&self) -> bool {
        self.raw.data.alias_target().is_some()
    }
}

/// Per-call resolver state. Never shared between calls.
struct TokenResolver<'a> {
    entries: Vec<Entry<'a>>,
    index: HashMap<&'a str, usize>,
    resolved: Vec<Option<Token>>,
    /// Tokens whose alias chain is being followed, outermost first.
    in_progress: Vec<usize>,
    catalog: &'a PropertyCatalog,
    options: &'a ResolveOptions,
}

/// Resolves raw tokens into a linked graph attached to `forest`.
pub fn resolve_tokens(
    raw_tokens: &[RawToken],
    forest: GroupForest,
    properties: &[RawPropertyDefinition],
    options: &ResolveOptions,
) -> Result<TokenGraph, ResolveError> {
    let catalog = PropertyCatalog::new(properties)?;
    let mut resolver = TokenResolver::new(raw_tokens, &catalog, options)?;

    resolver.run_phase("pure literal", |e| e.kind.is_pure() && !e.is_aliased())?;
    resolver.run_phase("pure aliased", |e| e.kind.is_pure() && e.is_aliased())?;
    resolver.run_phase("compound literal", |e| e.kind.is_compound() && !e.is_aliased())?;
    resolver.run_phase("compound aliased", |e| e.kind.is_compound() && e.is_aliased())?;

    let mut tokens = resolver.finish()?;
    assign_parents(&mut tokens, &forest);
    if options.link_layers {
        link_layers(&mut tokens);
    }

    let by_id = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.clone(), TokenIdx::new(i)))
        .collect();

    debug!(tokens = tokens.len(), "resolved token graph");
    Ok(TokenGraph {
        tokens,
        by_id,
        forest,
        properties: catalog.definitions().to_vec(),
    })
}

impl<'a> TokenResolver<'a> {
    fn new(
        raw_tokens: &'a [RawToken],
        catalog: &'a PropertyCatalog,
        options: &'a ResolveOptions,
    ) -> Result<Self, ResolveError> {
        if raw_tokens.len() > options.max_tokens {
            return Err(ResolveError::LengthExceedsLimit {
                field: "tokens",
                len: raw_tokens.len(),
                max: options.max_tokens,
            });
        }

        let mut entries = Vec::with_capacity(raw_tokens.len());
        let mut index = HashMap::with_capacity(raw_tokens.len());
        for (i, raw) in raw_tokens.iter().enumerate() {
            let id: Id = Arc::from(raw.persistent_id.as_str());
            let kind = TokenKind::from_name(&raw.token_type).ok_or_else(|| {
                ResolveError::UnsupportedKind {
                    id: id.clone(),
                    kind: raw.token_type.clone(),
                }
            })?;
            if index.insert(raw.persistent_id.as_str(), i).is_some() {
                return Err(ResolveError::DuplicateId { what: "token", id });
            }
            entries.push(Entry { raw, id, kind });
        }

        Ok(TokenResolver {
            resolved: (0..entries.len()).map(|_| None).collect(),
            entries,
            index,
            in_progress: Vec::new(),
            catalog,
            options,
        })
    }

    fn run_phase(
        &mut self,
        name: &'static str,
        belongs: impl Fn(&Entry<'_>) -> bool,
    ) -> Result<(), ResolveError> {
        let members: Vec<usize> = (0..self.entries.len())
            .filter(|&i| belongs(&self.entries[i]))
            .collect();
        debug!(phase = name, tokens = members.len(), "resolving phase");
        for i in members {
            self.materialize(i)?;
        }
        Ok(())
    }

    /// Builds token `i` unless it already exists.
    fn materialize(&mut self, i: usize) -> Result<(), ResolveError> {
        if self.resolved[i].is_some() {
            return Ok(());
        }
        if let Some(pos) = self.in_progress.iter().position(|&p| p == i) {
            let mut chain: Vec<Id> = self.in_progress[pos..]
                .iter()
                .map(|&p| self.entries[p].id.clone())
                .collect();
            chain.push(self.entries[i].id.clone());
            return Err(ResolveError::CyclicReference { chain });
        }
        if self.in_progress.len() >= self.options.max_alias_depth {
            return Err(ResolveError::AliasChainTooDeep {
                id: self.entries[self.in_progress[0]].id.clone(),
                max: self.options.max_alias_depth,
            });
        }

        self.in_progress.push(i);
        let built = self.build(i);
        self.in_progress.pop();

        let token = built?;
        trace!(token = %token.id, kind = %token.kind, "materialized token");
        self.resolved[i] = Some(token);
        Ok(())
    }

    fn build(&mut self, i: usize) -> Result<Token, ResolveError> {
        let raw = self.entries[i].raw;
        let id = self.entries[i].id.clone();
        let kind = self.entries[i].kind;

        let value = match raw.data.alias_target() {
            Some(target) => {
                let t = self.lookup(&id, target, kind)?;
                self.materialize(t)?;
                let link = TokenRef::base(self.entries[t].id.clone(), TokenIdx::new(t));
                TokenValue::alias(kind, link)
            }
            None => {
                let literal = raw
                    .data
                    .literal_value()
                    .ok_or_else(|| ResolveError::MissingValue { id: id.clone() })?;
                decode_literal(kind, &id, literal, self)?
            }
        };

        Ok(Token {
            versioned_id: Arc::from(raw.id.as_str()),
            brand_id: Arc::from(raw.brand_id.as_str()),
            design_system_version_id: Arc::from(raw.design_system_version_id.as_str()),
            theme_id: None,
            kind,
            name: raw.meta.name.clone(),
            description: raw.meta.description.clone(),
            origin: raw.origin_style.as_ref().map(origin_from_raw),
            parent: None,
            sort_order: i,
            properties: self.catalog.values_for(&id, &raw.custom_property_overrides)?,
            created_at: raw.created_at.clone(),
            updated_at: raw.updated_at.clone(),
            value,
            layers: Vec::new(),
            is_virtual: false,
            id,
        })
    }

    /// Finds the arena slot of `target`, checking it has the expected kind.
    fn lookup(&self, from: &Id, target: &str, expected: TokenKind) -> Result<usize, ResolveError> {
        let t = *self
            .index
            .get(target)
            .ok_or_else(|| ResolveError::DanglingReference {
                from: from.clone(),
                target: Arc::from(target),
            })?;
        let found = self.entries[t].kind;
        if found != expected {
            return Err(ResolveError::KindMismatch {
                from: from.clone(),
                target: self.entries[t].id.clone(),
                expected,
                found,
            });
        }
        Ok(t)
    }

    fn finish(self) -> Result<Vec<Token>, ResolveError> {
        self.resolved
            .into_iter()
            .zip(self.entries)
            .map(|(token, entry)| token.ok_or(ResolveError::MissingValue { id: entry.id }))
            .collect()
    }
}

impl LinkResolver for TokenResolver<'_> {
    /// Nested aliases only ever target pure kinds, all of which are built
    /// before the first compound token.
    fn link(
        &mut self,
        owner: &Id,
        target: &str,
        expected: TokenKind,
    ) -> Result<TokenRef, ResolveError> {
        let t = self.lookup(owner, target, expected)?;
        debug_assert!(self.resolved[t].is_some() || !expected.is_pure());
        Ok(TokenRef::base(self.entries[t].id.clone(), TokenIdx::new(t)))
    }
}

/// Attaches each token to the first group (in pre-order) listing it.
fn assign_parents(tokens: &mut [Token], forest: &GroupForest) {
    let index: HashMap<&str, usize> = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| (&*t.id, i))
        .collect();

    let mut assignments: Vec<Option<(GroupIdx, usize)>> = vec![None; tokens.len()];
    for (group_idx, group) in forest.iter_indexed() {
        for (position, token_id) in group.token_ids.iter().enumerate() {
            let Some(&t) = index.get(&**token_id) else {
                continue;
            };
            match assignments[t] {
                None => assignments[t] = Some((group_idx, position)),
                Some((owner, _)) if owner != group_idx => {
                    warn!(token = %token_id, group = %group.id, "token listed by several groups");
                }
                Some(_) => {}
            }
        }
    }

    for (token, assignment) in tokens.iter_mut().zip(assignments) {
        if let Some((group_idx, position)) = assignment {
            token.parent = Some(group_idx);
            token.sort_order = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::RawTokenData;
    use crate::model::{Aliasable, Color};

    fn token(id: &str, kind: &str, data: RawTokenData) -> RawToken {
        RawToken {
            id: format!("v-{id}"),
            brand_id: "brand".to_string(),
            design_system_version_id: "dsv".to_string(),
            persistent_id: id.to_string(),
            token_type: kind.to_string(),
            meta: crate::codec::RawMeta {
                name: id.to_string(),
                description: String::new(),
            },
            origin_style: None,
            data,
            custom_property_overrides: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn resolve(raw: &[RawToken]) -> Result<TokenGraph, ResolveError> {
        resolve_tokens(raw, GroupForest::new(), &[], &ResolveOptions::default())
    }

    #[test]
    fn test_pure_literal_color() {
        let graph = resolve(&[token("red", "Color", RawTokenData::literal(json!("ff0000ff")))])
            .unwrap();
        let red = graph.token("red").unwrap();
        assert_eq!(
            red.value,
            TokenValue::Color(Aliasable::Literal(Color {
                hex: "ff0000ff".to_string(),
                r: 255,
                g: 0,
                b: 0,
                a: 255,
            }))
        );
        assert!(red.referenced_token().is_none());
        assert_eq!(&*red.versioned_id, "v-red");
    }

    #[test]
    fn test_forward_alias_chain_kept_as_links() {
        // A -> B -> C, declared before their targets.
        let graph = resolve(&[
            token("a", "Color", RawTokenData::alias("b")),
            token("b", "Color", RawTokenData::alias("c")),
            token("c", "Color", RawTokenData::literal(json!("0000ffff"))),
        ])
        .unwrap();

        let a = graph.token("a").unwrap();
        let b = graph.token("b").unwrap();
        assert_eq!(a.referenced_token().map(|r| &*r.id), Some("b"));
        assert_eq!(b.referenced_token().map(|r| &*r.id), Some("c"));
        assert_eq!(graph.follow(a.referenced_token().unwrap()).map(|t| &*t.id), Some("b"));

        let literal = graph.literal_value(graph.index_of("a").unwrap());
        assert_eq!(literal, &graph.token("c").unwrap().value);
    }

    #[test]
    fn test_dangling_alias() {
        let err = resolve(&[token("a", "Color", RawTokenData::alias("ghost"))]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::DanglingReference {
                from: "a".into(),
                target: "ghost".into()
            }
        );
    }

    #[test]
    fn test_self_alias_is_cycle() {
        let err = resolve(&[token("a", "Color", RawTokenData::alias("a"))]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::CyclicReference {
                chain: vec!["a".into(), "a".into()]
            }
        );
    }

    #[test]
    fn test_two_token_cycle() {
        let err = resolve(&[
            token("a", "Measure", RawTokenData::alias("b")),
            token("b", "Measure", RawTokenData::alias("a")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::CyclicReference {
                chain: vec!["a".into(), "b".into(), "a".into()]
            }
        );
    }

    #[test]
    fn test_alias_depth_limit() {
        // `d` is built in the literal phase, so the chain followed is a -> b -> c.
        let raw = vec![
            token("a", "Text", RawTokenData::alias("b")),
            token("b", "Text", RawTokenData::alias("c")),
            token("c", "Text", RawTokenData::alias("d")),
            token("d", "Text", RawTokenData::literal(json!("x"))),
        ];
        let options = ResolveOptions::default().with_max_alias_depth(2);
        let err = resolve_tokens(&raw, GroupForest::new(), &[], &options).unwrap_err();
        assert!(matches!(err, ResolveError::AliasChainTooDeep { max: 2, .. }));
    }

    #[test]
    fn test_top_level_kind_mismatch() {
        let err = resolve(&[
            token("a", "Color", RawTokenData::alias("m")),
            token("m", "Measure", RawTokenData::literal(json!({"measure": 1, "unit": "Pixels"}))),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::KindMismatch {
                expected: TokenKind::Color,
                found: TokenKind::Measure,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_value() {
        let err = resolve(&[token("a", "Color", RawTokenData::default())]).unwrap_err();
        assert_eq!(err, ResolveError::MissingValue { id: "a".into() });
    }

    #[test]
    fn test_unsupported_kind() {
        let err = resolve(&[token("a", "Duration", RawTokenData::literal(json!(1)))]).unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedKind { .. }));
    }

    #[test]
    fn test_duplicate_token_id() {
        let err = resolve(&[
            token("a", "Text", RawTokenData::literal(json!("x"))),
            token("a", "Text", RawTokenData::literal(json!("y"))),
        ])
        .unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateId { what: "token", .. }));
    }

    #[test]
    fn test_alias_wins_over_co_present_value() {
        let data = RawTokenData {
            alias_to: Some("b".to_string()),
            value: Some(json!("ff0000ff")),
        };
        let graph = resolve(&[
            token("a", "Color", data),
            token("b", "Color", RawTokenData::literal(json!("00ff00ff"))),
        ])
        .unwrap();
        let a = graph.token("a").unwrap();
        assert!(matches!(a.value, TokenValue::Color(Aliasable::Alias(_))));
    }

    #[test]
    fn test_compound_alias_of_compound_alias() {
        let border = json!({
            "color": { "aliasTo": "black" },
            "width": { "value": { "measure": 1, "unit": "Pixels" } },
            "position": "Inside"
        });
        let graph = resolve(&[
            token("outer", "Border", RawTokenData::alias("inner")),
            token("inner", "Border", RawTokenData::alias("base")),
            token("base", "Border", RawTokenData::literal(border)),
            token("black", "Color", RawTokenData::literal(json!("000000ff"))),
        ])
        .unwrap();

        let base = graph.token("base").unwrap();
        let refs: Vec<_> = base.value.references().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(refs, vec!["black"]);
        assert_eq!(
            graph.token("outer").unwrap().referenced_token().map(|r| &*r.id),
            Some("inner")
        );
    }

    #[test]
    fn test_unparented_tokens_keep_declaration_order() {
        let graph = resolve(&[
            token("x", "Text", RawTokenData::literal(json!("x"))),
            token("y", "Text", RawTokenData::literal(json!("y"))),
        ])
        .unwrap();
        assert_eq!(graph.token("x").unwrap().sort_order, 0);
        assert_eq!(graph.token("y").unwrap().sort_order, 1);
        assert!(graph.token("y").unwrap().parent.is_none());
    }
}
