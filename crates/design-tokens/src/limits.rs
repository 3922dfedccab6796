//! Resource limits for resolution.
//!
//! These limits bound the work a single resolution call performs on
//! untrusted input.

/// Maximum tokens per resolution call.
pub const MAX_TOKENS: usize = 1_000_000;

/// Maximum groups per resolution call.
pub const MAX_GROUPS: usize = 250_000;

/// Maximum overrides per theme.
pub const MAX_OVERRIDES_PER_THEME: usize = 1_000_000;

/// Maximum length of an alias chain (A -> B -> ... -> literal).
pub const MAX_ALIAS_DEPTH: usize = 512;

/// Maximum stops in one gradient value.
pub const MAX_GRADIENT_STOPS: usize = 1024;

/// Per-call resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub max_tokens: usize,
    pub max_groups: usize,
    pub max_overrides: usize,
    pub max_alias_depth: usize,
    /// Build shadow/gradient/blur layer stacks after resolution.
    pub link_layers: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            max_tokens: MAX_TOKENS,
            max_groups: MAX_GROUPS,
            max_overrides: MAX_OVERRIDES_PER_THEME,
            max_alias_depth: MAX_ALIAS_DEPTH,
            link_layers: true,
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }

    pub fn with_layers(mut self, link_layers: bool) -> Self {
        self.link_layers = link_layers;
        self
    }
}
