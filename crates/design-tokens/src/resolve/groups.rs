//! Group forest construction.
//!
//! Groups arrive as a flat list where each record names its children by
//! id. A child id that matches a group is a subgroup; anything else is a
//! token id (tokens are resolved separately).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec::RawGroup;
use crate::error::ResolveError;
use crate::limits::ResolveOptions;
use crate::model::{Group, GroupForest, GroupIdx, Id, TokenKind};

/// One pending visit during the pre-order walk.
struct Visit {
    input: usize,
    parent: Option<usize>,
    path: Vec<String>,
}

/// Builds the group forest from flat records.
///
/// Groups are stored in pre-order: each root (in input order) followed by
/// its subgroups' pre-orders. Groups unreachable from a root are appended
/// as detached subtrees. A group declared as a child of several groups
/// belongs to the first one reached.
pub fn build_group_forest(
    raw_groups: &[RawGroup],
    options: &ResolveOptions,
) -> Result<GroupForest, ResolveError> {
    if raw_groups.len() > options.max_groups {
        return Err(ResolveError::LengthExceedsLimit {
            field: "groups",
            len: raw_groups.len(),
            max: options.max_groups,
        });
    }

    // (a) instantiate every group by id
    let mut input_index: HashMap<&str, usize> = HashMap::with_capacity(raw_groups.len());
    let mut kinds = Vec::with_capacity(raw_groups.len());
    for (i, raw) in raw_groups.iter().enumerate() {
        if input_index.insert(raw.persistent_id.as_str(), i).is_some() {
            return Err(ResolveError::DuplicateId {
                what: "group",
                id: Arc::from(raw.persistent_id.as_str()),
            });
        }
        let kind =
            TokenKind::from_name(&raw.token_type).ok_or_else(|| ResolveError::UnsupportedKind {
                id: Arc::from(raw.persistent_id.as_str()),
                kind: raw.token_type.clone(),
            })?;
        kinds.push(kind);
    }

    // (b) which declared children are groups
    let child_groups: Vec<Vec<usize>> = raw_groups
        .iter()
        .map(|raw| {
            raw.children_ids
                .iter()
                .filter_map(|child| input_index.get(child.as_str()).copied())
                .collect()
        })
        .collect();
    let mut declared_as_child = vec![false; raw_groups.len()];
    for children in &child_groups {
        for &child in children {
            declared_as_child[child] = true;
        }
    }

    // (c, d, e) pre-order walk assigning parents and paths
    let mut order: Vec<Visit> = Vec::with_capacity(raw_groups.len());
    let mut visited = vec![false; raw_groups.len()];

    let roots: Vec<usize> = (0..raw_groups.len())
        .filter(|&i| raw_groups[i].is_root)
        .collect();
    let detached: Vec<usize> = (0..raw_groups.len())
        .filter(|&i| !raw_groups[i].is_root && !declared_as_child[i])
        .collect();

    for &start in roots.iter().chain(detached.iter()) {
        walk(raw_groups, &child_groups, start, &mut visited, &mut order);
    }
    // Whatever is left is only reachable through a cycle of groups.
    for start in 0..raw_groups.len() {
        if !visited[start] {
            warn!(group = %raw_groups[start].persistent_id, "group is part of a parent cycle");
            walk(raw_groups, &child_groups, start, &mut visited, &mut order);
        }
    }

    let mut new_index = vec![0usize; raw_groups.len()];
    for (position, visit) in order.iter().enumerate() {
        new_index[visit.input] = position;
    }

    let mut forest = GroupForest::new();
    for visit in &order {
        let raw = &raw_groups[visit.input];
        let subgroups = child_groups[visit.input]
            .iter()
            .copied()
            .filter(|&child| order[new_index[child]].parent == Some(visit.input))
            .map(|child| GroupIdx::new(new_index[child]))
            .collect();
        let token_ids: Vec<Id> = raw
            .children_ids
            .iter()
            .filter(|child| !input_index.contains_key(child.as_str()))
            .map(|child| Arc::from(child.as_str()))
            .collect();

        let group = Group {
            id: Arc::from(raw.persistent_id.as_str()),
            brand_id: Arc::from(raw.brand_id.as_str()),
            kind: kinds[visit.input],
            is_root: raw.is_root,
            name: raw.meta.name.clone(),
            description: raw.meta.description.clone(),
            children_ids: raw
                .children_ids
                .iter()
                .map(|child| Arc::from(child.as_str()))
                .collect(),
            subgroups,
            token_ids,
            path: visit.path.clone(),
            parent: visit.parent.map(|p| GroupIdx::new(new_index[p])),
        };
        let idx = GroupIdx::new(forest.groups.len());
        if group.is_root {
            forest.roots.push(idx);
        }
        forest.by_id.insert(group.id.clone(), idx);
        forest.groups.push(group);
    }

    debug!(
        groups = forest.groups.len(),
        roots = forest.roots.len(),
        "built group forest"
    );
    Ok(forest)
}

/// Pre-order walk from `start`, skipping already visited groups.
fn walk(
    raw_groups: &[RawGroup],
    child_groups: &[Vec<usize>],
    start: usize,
    visited: &mut [bool],
    order: &mut Vec<Visit>,
) {
    let mut stack = vec![Visit {
        input: start,
        parent: None,
        path: Vec::new(),
    }];

    while let Some(visit) = stack.pop() {
        if visited[visit.input] {
            continue;
        }
        visited[visit.input] = true;

        let raw = &raw_groups[visit.input];
        let child_path = if raw.is_root {
            Vec::new()
        } else {
            let mut p = visit.path.clone();
            p.push(raw.meta.name.clone());
            p
        };

        // Reverse so the first declared child is popped first.
        for &child in child_groups[visit.input].iter().rev() {
            if !visited[child] {
                stack.push(Visit {
                    input: child,
                    parent: Some(visit.input),
                    path: child_path.clone(),
                });
            }
        }
        order.push(visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RawMeta;

    fn group(id: &str, name: &str, is_root: bool, children: &[&str]) -> RawGroup {
        RawGroup {
            persistent_id: id.to_string(),
            brand_id: "brand".to_string(),
            token_type: "Color".to_string(),
            is_root,
            meta: RawMeta {
                name: name.to_string(),
                description: String::new(),
            },
            children_ids: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn ids(forest: &GroupForest) -> Vec<&str> {
        forest.iter().map(|g| &*g.id).collect()
    }

    #[test]
    fn test_pre_order_independent_of_input_order() {
        // Declared out of order on purpose: leaves first, root last.
        let raw = vec![
            group("blue", "Blue", false, &["blue-500"]),
            group("red", "Red", false, &["red-500", "red-dark"]),
            group("red-dark", "Dark", false, &["red-900"]),
            group("root", "Colors", true, &["red", "blue", "black"]),
        ];
        let forest = build_group_forest(&raw, &ResolveOptions::default()).unwrap();

        assert_eq!(ids(&forest), vec!["root", "red", "red-dark", "blue"]);
        assert_eq!(forest.roots().count(), 1);
    }

    #[test]
    fn test_children_partitioned_in_declared_order() {
        let raw = vec![
            group("root", "Colors", true, &["red", "black", "white"]),
            group("red", "Red", false, &["red-500", "red-dark", "red-100"]),
            group("red-dark", "Dark", false, &[]),
        ];
        let forest = build_group_forest(&raw, &ResolveOptions::default()).unwrap();

        let root = forest.group("root").unwrap();
        assert_eq!(root.token_ids, vec![Id::from("black"), Id::from("white")]);
        assert_eq!(root.subgroups.len(), 1);

        let red = forest.group("red").unwrap();
        assert_eq!(red.token_ids, vec![Id::from("red-500"), Id::from("red-100")]);
        assert_eq!(red.children_ids.len(), 3);
    }

    #[test]
    fn test_paths_drop_root_segment() {
        let raw = vec![
            group("root", "Colors", true, &["brand"]),
            group("brand", "Brand", false, &["primary"]),
            group("primary", "Primary", false, &["tone"]),
            group("tone", "Tone", false, &[]),
        ];
        let forest = build_group_forest(&raw, &ResolveOptions::default()).unwrap();

        assert!(forest.group("root").unwrap().path.is_empty());
        assert!(forest.group("brand").unwrap().path.is_empty());
        assert_eq!(forest.group("primary").unwrap().path, vec!["Brand"]);
        assert_eq!(forest.group("tone").unwrap().path, vec!["Brand", "Primary"]);
        assert_eq!(
            forest.group("tone").unwrap().full_path(),
            vec!["Brand", "Primary", "Tone"]
        );
    }

    #[test]
    fn test_parents_and_ancestors() {
        let raw = vec![
            group("root", "Colors", true, &["a"]),
            group("a", "A", false, &["b"]),
            group("b", "B", false, &[]),
        ];
        let forest = build_group_forest(&raw, &ResolveOptions::default()).unwrap();

        assert_eq!(forest.group("root").unwrap().parent, None);
        let b = forest.index_of("b").unwrap();
        let names: Vec<_> = forest.ancestors(b).iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Colors"]);
        let a = forest.index_of("a").unwrap();
        assert_eq!(forest.children(a).map(|g| &*g.id).collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_shared_child_belongs_to_first_parent() {
        let raw = vec![
            group("root", "Colors", true, &["x", "y"]),
            group("x", "X", false, &["shared"]),
            group("y", "Y", false, &["shared"]),
            group("shared", "Shared", false, &[]),
        ];
        let forest = build_group_forest(&raw, &ResolveOptions::default()).unwrap();

        let shared = forest.group("shared").unwrap();
        assert_eq!(shared.parent, forest.index_of("x"));
        assert!(forest.group("y").unwrap().subgroups.is_empty());
        assert_eq!(forest.len(), 4);
    }

    #[test]
    fn test_detached_and_cyclic_groups_kept() {
        let raw = vec![
            group("root", "Colors", true, &[]),
            group("orphan", "Orphan", false, &["orphan-child"]),
            group("orphan-child", "Child", false, &[]),
            group("c1", "C1", false, &["c2"]),
            group("c2", "C2", false, &["c1"]),
        ];
        let forest = build_group_forest(&raw, &ResolveOptions::default()).unwrap();

        assert_eq!(ids(&forest), vec!["root", "orphan", "orphan-child", "c1", "c2"]);
        assert_eq!(forest.group("orphan").unwrap().parent, None);
        assert_eq!(forest.group("orphan-child").unwrap().path, vec!["Orphan"]);
        assert_eq!(forest.group("c2").unwrap().parent, forest.index_of("c1"));
    }

    #[test]
    fn test_duplicate_group_id() {
        let raw = vec![
            group("root", "Colors", true, &[]),
            group("root", "Again", true, &[]),
        ];
        let err = build_group_forest(&raw, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateId { what: "group", .. }));
    }

    #[test]
    fn test_unsupported_group_kind() {
        let mut raw = group("root", "Motion", true, &[]);
        raw.token_type = "Duration".to_string();
        let err = build_group_forest(&[raw], &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedKind { .. }));
    }

    #[test]
    fn test_group_limit() {
        let raw = vec![group("root", "Colors", true, &[])];
        let options = ResolveOptions {
            max_groups: 0,
            ..ResolveOptions::default()
        };
        let err = build_group_forest(&raw, &options).unwrap_err();
        assert!(matches!(err, ResolveError::LengthExceedsLimit { field: "groups", .. }));
    }
}
