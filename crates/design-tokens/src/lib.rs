//! Design-token reference resolution.
//!
//! Turns the flat records a design-system backend persists (tokens, groups,
//! custom property definitions and theme overrides) into a linked, typed
//! graph:
//!
//! - groups form a forest ordered by each group's `childrenIds`
//! - aliases become links into the graph, kept rather than flattened
//! - shadow, gradient and blur tokens are stacked into layers
//! - themes resolve to sparse replicas that fall back to the base graph
//!
//! Resolution is synchronous and pure. Every call builds fresh state, so
//! two calls over the same input yield equal but independent graphs.
//!
//! ```ignore
//! let raw: RawDesignSystem = serde_json::from_str(&json)?;
//! let resolved = resolve_design_system(&raw, &ResolveOptions::default())?;
//! let red = resolved.graph.token("red").unwrap();
//! ```

pub mod codec;
pub mod compare;
pub mod error;
pub mod graph;
pub mod limits;
pub mod model;
pub mod resolve;

pub use codec::{RawDesignSystem, RawGroup, RawTheme, RawToken, encode_token_data};
pub use compare::{StructuralEq, is_equal_token_value};
pub use error::ResolveError;
pub use graph::{ResolvedDesignSystem, ResolvedTheme, TokenGraph};
pub use limits::ResolveOptions;
pub use model::{Aliasable, Group, GroupForest, Id, Token, TokenKind, TokenRef, TokenValue};
pub use resolve::{
    build_group_forest, resolve_design_system, resolve_graph, resolve_theme, resolve_tokens,
};
