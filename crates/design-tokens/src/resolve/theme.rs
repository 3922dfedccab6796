//! Theme override resolution.
//!
//! A theme stores sparse overrides of base tokens. Each override becomes a
//! replica of its base token (identity, metadata, parent and properties
//! copied, theme id stamped, origin replaced) carrying the override value.
//! Aliases first look for an override of the target in the same theme and
//! fall back to the base graph. Phases mirror base resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::codec::{LinkResolver, RawTheme, RawThemeOverride, decode_literal};
use crate::error::ResolveError;
use crate::graph::{ResolvedTheme, TokenGraph};
use crate::limits::ResolveOptions;
use crate::model::{Id, Token, TokenIdx, TokenKind, TokenRef, TokenValue};

use super::origin_from_raw;

struct OverrideEntry<'a> {
    raw: &'a RawThemeOverride,
    id: Id,
    kind: TokenKind,
    base: TokenIdx,
}

impl OverrideEntry<'_> {
    fn is_aliased(&self) -> bool {
        self.raw.data.alias_target().is_some()
    }
}

/// Per-call theme resolver state.
struct ThemeResolver<'a> {
    base: &'a TokenGraph,
    theme_id: Id,
    entries: Vec<OverrideEntry<'a>>,
    index: HashMap<&'a str, usize>,
    resolved: Vec<Option<Token>>,
    in_progress: Vec<usize>,
    options: &'a ResolveOptions,
}

/// Resolves one theme's overrides against a base graph.
pub fn resolve_theme(
    base: &TokenGraph,
    theme: &RawTheme,
    options: &ResolveOptions,
) -> Result<ResolvedTheme, ResolveError> {
    let mut resolver = ThemeResolver::new(base, theme, options)?;

    resolver.run_phase("pure literal", |e| e.kind.is_pure() && !e.is_aliased())?;
    resolver.run_phase("pure aliased", |e| e.kind.is_pure() && e.is_aliased())?;
    resolver.run_phase("compound literal", |e| e.kind.is_compound() && !e.is_aliased())?;
    resolver.run_phase("compound aliased", |e| e.kind.is_compound() && e.is_aliased())?;

    let mut tokens = resolver.finish()?;
    let by_id: HashMap<Id, TokenIdx> = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.clone(), TokenIdx::new(i)))
        .collect();
    relink_layers(&mut tokens, &by_id);

    debug!(theme = %theme.id, replicas = tokens.len(), "resolved theme");
    Ok(ResolvedTheme {
        id: Arc::from(theme.id.as_str()),
        brand_id: Arc::from(theme.brand_id.as_str()),
        name: theme.meta.name.clone(),
        description: theme.meta.description.clone(),
        tokens,
        by_id,
    })
}

/// Points the layer stacks of replicas at the replicas of this theme.
///
/// Stack order and `is_virtual` are those of the base graph; only layers
/// that this theme overrides switch to `RefScope::Theme`.
fn relink_layers(tokens: &mut [Token], by_id: &HashMap<Id, TokenIdx>) {
    for token in tokens.iter_mut() {
        for layer in &mut token.layers {
            if let Some(&idx) = by_id.get(&layer.id) {
                *layer = TokenRef::theme(layer.id.clone(), idx);
            }
        }
    }
}

impl<'a> ThemeResolver<'a> {
    fn new(
        base: &'a TokenGraph,
        theme: &'a RawTheme,
        options: &'a ResolveOptions,
    ) -> Result<Self, ResolveError> {
        if theme.overrides.len() > options.max_overrides {
            return Err(ResolveError::LengthExceedsLimit {
                field: "theme overrides",
                len: theme.overrides.len(),
                max: options.max_overrides,
            });
        }

        let theme_id: Id = Arc::from(theme.id.as_str());
        let mut entries = Vec::with_capacity(theme.overrides.len());
        let mut index = HashMap::with_capacity(theme.overrides.len());

        for (i, raw) in theme.overrides.iter().enumerate() {
            let id: Id = Arc::from(raw.token_persistent_id.as_str());
            let kind = TokenKind::from_name(&raw.token_type).ok_or_else(|| {
                ResolveError::UnsupportedKind {
                    id: id.clone(),
                    kind: raw.token_type.clone(),
                }
            })?;

            match (raw.data.alias_target(), raw.data.literal_value()) {
                (None, None) => {
                    return Err(ResolveError::MalformedOverride {
                        theme: theme_id.clone(),
                        token: id,
                        reason: "neither value nor alias",
                    });
                }
                (Some(_), Some(_)) => {
                    return Err(ResolveError::MalformedOverride {
                        theme: theme_id.clone(),
                        token: id,
                        reason: "both value and alias",
                    });
                }
                _ => {}
            }

            let base_idx = base
                .index_of(&id)
                .ok_or_else(|| ResolveError::DanglingReference {
                    from: theme_id.clone(),
                    target: id.clone(),
                })?;
            let base_kind = base.token_at(base_idx).kind;
            if base_kind != kind {
                return Err(ResolveError::KindMismatch {
                    from: theme_id.clone(),
                    target: id,
                    expected: base_kind,
                    found: kind,
                });
            }
            if index.insert(raw.token_persistent_id.as_str(), i).is_some() {
                return Err(ResolveError::DuplicateId {
                    what: "theme override",
                    id,
                });
            }

            entries.push(OverrideEntry {
                raw,
                id,
                kind,
                base: base_idx,
            });
        }

        Ok(ThemeResolver {
            base,
            theme_id,
            resolved: (0..entries.len()).map(|_| None).collect(),
            entries,
            index,
            in_progress: Vec::new(),
            options,
        })
    }

    fn run_phase(
        &mut self,
        name: &'static str,
        belongs: impl Fn(&OverrideEntry<'_>) -> bool,
    ) -> Result<(), ResolveError> {
        let members: Vec<usize> = (0..self.entries.len())
            .filter(|&i| belongs(&self.entries[i]))
            .collect();
        debug!(theme = %self.theme_id, phase = name, overrides = members.len(), "resolving phase");
        for i in members {
            self.materialize(i)?;
        }
        Ok(())
    }

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

        let replica = built?;
        trace!(theme = %self.theme_id, token = %replica.id, "materialized replica");
        self.resolved[i] = Some(replica);
        Ok(())
    }

    fn build(&mut self, i: usize) -> Result<Token, ResolveError> {
        let raw = self.entries[i].raw;
        let id = self.entries[i].id.clone();
        let kind = self.entries[i].kind;

        let mut replica = self.replica_of(i);
        replica.value = match raw.data.alias_target() {
            Some(target) => TokenValue::alias(kind, self.resolve_link(&id, target, kind, true)?),
            None => {
                // Checked when the entry was created.
                let literal = raw.data.literal_value().ok_or_else(|| {
                    ResolveError::MalformedOverride {
                        theme: self.theme_id.clone(),
                        token: id.clone(),
                        reason: "neither value nor alias",
                    }
                })?;
                decode_literal(kind, &id, literal, self)?
            }
        };
        Ok(replica)
    }

    /// A copy of the base token with the theme stamped and the override's
    /// origin substituted. Its value is replaced by the caller.
    fn replica_of(&self, i: usize) -> Token {
        let entry = &self.entries[i];
        let mut replica = self.base.token_at(entry.base).clone();
        replica.theme_id = Some(self.theme_id.clone());
        replica.origin = entry.raw.origin.as_ref().map(origin_from_raw);
        replica
    }

    /// Links to `target`: its override in this theme if any, else the base
    /// token. `materialize` builds a same-theme target on demand.
    fn resolve_link(
        &mut self,
        from: &Id,
        target: &str,
        expected: TokenKind,
        materialize: bool,
    ) -> Result<TokenRef, ResolveError> {
        if let Some(&t) = self.index.get(target) {
            let found = self.entries[t].kind;
            if found != expected {
                return Err(ResolveError::KindMismatch {
                    from: from.clone(),
                    target: self.entries[t].id.clone(),
                    expected,
                    found,
                });
            }
            if materialize {
                self.materialize(t)?;
            }
            return Ok(TokenRef::theme(self.entries[t].id.clone(), TokenIdx::new(t)));
        }

        let b = self
            .base
            .index_of(target)
            .ok_or_else(|| ResolveError::DanglingReference {
                from: from.clone(),
                target: Arc::from(target),
            })?;
        let base_token = self.base.token_at(b);
        if base_token.kind != expected {
            return Err(ResolveError::KindMismatch {
                from: from.clone(),
                target: base_token.id.clone(),
                expected,
                found: base_token.kind,
            });
        }
        Ok(TokenRef::base(base_token.id.clone(), b))
    }

    fn finish(self) -> Result<Vec<Token>, ResolveError> {
        self.resolved
            .into_iter()
            .zip(self.entries)
            .map(|(token, entry)| token.ok_or(ResolveError::MissingValue { id: entry.id }))
            .collect()
    }
}

impl LinkResolver for ThemeResolver<'_> {
    /// Nested aliases target pure kinds, whose overrides are all built in
    /// the first two phases.
    fn link(
        &mut self,
        owner: &Id,
        target: &str,
        expected: TokenKind,
    ) -> Result<TokenRef, ResolveError> {
        self.resolve_link(owner, target, expected, false)
    }
}
