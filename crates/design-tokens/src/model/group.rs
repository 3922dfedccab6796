//! Token groups and the group forest.

use std::collections::HashMap;

use crate::model::{GroupIdx, Id, TokenKind};

/// A resolved group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: Id,
    pub brand_id: Id,
    pub kind: TokenKind,
    pub is_root: bool,
    pub name: String,
    pub description: String,
    /// Child ids exactly as declared (groups and tokens mixed).
    pub children_ids: Vec<Id>,
    /// Child groups, in declaration order.
    pub subgroups: Vec<GroupIdx>,
    /// Child ids that are not groups, in declaration order.
    pub token_ids: Vec<Id>,
    /// Names of the ancestors below the root, outermost first.
    pub path: Vec<String>,
    pub parent: Option<GroupIdx>,
}

impl Group {
    /// Returns `path` followed by this group's own name.
    ///
    /// Roots have an empty full path.
    pub fn full_path(&self) -> Vec<String> {
        let mut full = self.path.clone();
        if !self.is_root {
            full.push(self.name.clone());
        }
        full
    }

    /// Position of a token id inside this group's token list.
    pub fn token_position(&self, token_id: &str) -> Option<usize> {
        self.token_ids.iter().position(|id| &**id == token_id)
    }
}

/// All groups of a design system, stored in pre-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupForest {
    pub(crate) groups: Vec<Group>,
    pub(crate) roots: Vec<GroupIdx>,
    pub(crate) by_id: HashMap<Id, GroupIdx>,
}

impl GroupForest {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Looks up a group by persistent id.
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.by_id.get(id).map(|idx| &self.groups[idx.index()])
    }

    /// Returns the handle of a group by persistent id.
    pub fn index_of(&self, id: &str) -> Option<GroupIdx> {
        self.by_id.get(id).copied()
    }

    pub fn group_at(&self, idx: GroupIdx) -> &Group {
        &self.groups[idx.index()]
    }

    /// Root groups, in input order.
    pub fn roots(&self) -> impl Iterator<Item = &Group> {
        self.roots.iter().map(|idx| &self.groups[idx.index()])
    }

    /// All groups in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// All groups with their handles, in pre-order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (GroupIdx, &Group)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupIdx::new(i), g))
    }

    /// Direct subgroups of a group.
    pub fn children(&self, idx: GroupIdx) -> impl Iterator<Item = &Group> {
        self.groups[idx.index()]
            .subgroups
            .iter()
            .map(|child| &self.groups[child.index()])
    }

    /// Ancestors of a group, nearest first.
    pub fn ancestors(&self, idx: GroupIdx) -> Vec<&Group> {
        let mut out = Vec::new();
        let mut current = self.groups[idx.index()].parent;
        while let Some(parent) = current {
            let group = &self.groups[parent.index()];
            out.push(group);
            current = group.parent;
        }
        out
    }

    /// The root group of a kind within a brand.
    pub fn root_of(&self, brand_id: &str, kind: TokenKind) -> Option<&Group> {
        self.roots()
            .find(|g| &*g.brand_id == brand_id && g.kind == kind)
    }
}
