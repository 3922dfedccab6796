//! Resolution of raw records into linked graphs.
//!
//! Groups are resolved first, then tokens (attached to the group forest),
//! then each theme against the finished base graph. Every call builds its
//! own state; nothing is cached between calls.

mod groups;
mod layers;
mod properties;
mod theme;
mod tokens;

pub use groups::build_group_forest;
pub use theme::resolve_theme;
pub use tokens::resolve_tokens;

use tracing::info;

use crate::codec::{RawDesignSystem, RawGroup, RawOrigin, RawPropertyDefinition, RawToken};
use crate::error::ResolveError;
use crate::graph::{ResolvedDesignSystem, TokenGraph};
use crate::limits::ResolveOptions;
use crate::model::Origin;

pub(crate) fn origin_from_raw(raw: &RawOrigin) -> Origin {
    Origin {
        id: raw.id.clone(),
        name: raw.name.clone(),
        source_id: raw.source_id.clone(),
    }
}

/// Resolves groups and tokens of one design-system version.
pub fn resolve_graph(
    tokens: &[RawToken],
    groups: &[RawGroup],
    properties: &[RawPropertyDefinition],
    options: &ResolveOptions,
) -> Result<TokenGraph, ResolveError> {
    let forest = build_group_forest(groups, options)?;
    resolve_tokens(tokens, forest, properties, options)
}

/// Resolves a complete design system: base graph and every theme.
///
/// Fails on the first error; no partial result is returned.
pub fn resolve_design_system(
    raw: &RawDesignSystem,
    options: &ResolveOptions,
) -> Result<ResolvedDesignSystem, ResolveError> {
    let graph = resolve_graph(&raw.tokens, &raw.groups, &raw.properties, options)?;
    let themes = raw
        .themes
        .iter()
        .map(|theme| resolve_theme(&graph, theme, options))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        tokens = graph.len(),
        groups = graph.groups().len(),
        themes = themes.len(),
        "resolved design system"
    );
    Ok(ResolvedDesignSystem { graph, themes })
}
