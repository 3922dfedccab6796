//! Multi-layer composite linking.
//!
//! Shadow, gradient and blur tokens imported from a design tool can be the
//! layers of one multi-layer style. Layers share the kind and the leading
//! segment of their origin id, wherever they are filed.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{GroupIdx, Token, TokenIdx, TokenKind, TokenRef};

/// Assigns `layers` and `is_virtual` on every layered token.
///
/// A stack is ordered by the pre-order position of each member's owning
/// group, then by the member's position in that group. With one owning
/// group this is exactly the group's `tokenIds` order. Only the first layer
/// is not virtual. A token without an origin key or an owning group is its
/// own single layer.
pub(crate) fn link_layers(tokens: &mut [Token]) {
    let mut stacks: HashMap<(TokenKind, &str), Vec<(GroupIdx, usize)>> = HashMap::new();
    let mut singles = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if !token.kind.is_layered() {
            continue;
        }
        match (token.origin_key(), token.parent) {
            (Some(key), Some(group)) => {
                stacks.entry((token.kind, key)).or_default().push((group, i))
            }
            _ => singles.push(i),
        }
    }

    let mut assignments: Vec<(usize, Vec<TokenRef>, bool)> = Vec::new();
    for (_, mut members) in stacks {
        members.sort_by_key(|&(group, i)| (group.index(), tokens[i].sort_order, i));
        let stack: Vec<TokenRef> = members
            .iter()
            .map(|&(_, i)| TokenRef::base(tokens[i].id.clone(), TokenIdx::new(i)))
            .collect();
        for (position, &(_, i)) in members.iter().enumerate() {
            assignments.push((i, stack.clone(), position > 0));
        }
    }
    for i in singles {
        let own = vec![TokenRef::base(tokens[i].id.clone(), TokenIdx::new(i))];
        assignments.push((i, own, false));
    }

    debug!(layered = assignments.len(), "linked layer stacks");
    for (i, layers, is_virtual) in assignments {
        tokens[i].layers = layers;
        tokens[i].is_virtual = is_virtual;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::{RawGroup, RawMeta, RawOrigin, RawToken, RawTokenData};
    use crate::limits::ResolveOptions;
    use crate::model::GroupForest;
    use crate::resolve::{build_group_forest, resolve_tokens};

    fn blur(id: &str, origin: Option<&str>) -> RawToken {
        RawToken {
            id: id.to_string(),
            brand_id: "brand".to_string(),
            design_system_version_id: "dsv".to_string(),
            persistent_id: id.to_string(),
            token_type: "Blur".to_string(),
            meta: RawMeta {
                name: id.to_string(),
                description: String::new(),
            },
            origin_style: origin.map(|o| RawOrigin {
                id: Some(o.to_string()),
                name: None,
                source_id: None,
            }),
            data: RawTokenData::literal(json!({
                "type": "Layer",
                "radius": { "value": { "measure": 4, "unit": "Pixels" } }
            })),
            custom_property_overrides: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn group(id: &str, is_root: bool, children: &[&str]) -> RawGroup {
        RawGroup {
            persistent_id: id.to_string(),
            brand_id: "brand".to_string(),
            token_type: "Blur".to_string(),
            is_root,
            meta: RawMeta {
                name: id.to_string(),
                description: String::new(),
            },
            children_ids: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn layer_ids(graph: &crate::graph::TokenGraph, id: &str) -> Vec<String> {
        graph
            .token(id)
            .unwrap()
            .layers
            .iter()
            .map(|r| r.id.to_string())
            .collect()
    }

    #[test]
    fn test_stacks_split_by_origin() {
        let options = ResolveOptions::default();
        let forest = build_group_forest(
            &[
                group("root", true, &["g1"]),
                group("g1", false, &["a1", "b1", "a2"]),
            ],
            &options,
        )
        .unwrap();
        let raw = vec![
            blur("a1", Some("S:a,0")),
            blur("a2", Some("S:a,1")),
            blur("b1", Some("S:b,0")),
            blur("loose", None),
        ];
        let graph = resolve_tokens(&raw, forest, &[], &options).unwrap();

        assert_eq!(layer_ids(&graph, "a1"), vec!["a1", "a2"]);
        assert_eq!(layer_ids(&graph, "a2"), vec!["a1", "a2"]);
        assert_eq!(layer_ids(&graph, "b1"), vec!["b1"]);
        assert_eq!(layer_ids(&graph, "loose"), vec!["loose"]);
        assert!(!graph.token("a1").unwrap().is_virtual);
        assert!(graph.token("a2").unwrap().is_virtual);
        assert!(!graph.token("loose").unwrap().is_virtual);
    }

    #[test]
    fn test_stack_spans_groups() {
        let options = ResolveOptions::default();
        let forest = build_group_forest(
            &[
                group("root", true, &["g1", "g2"]),
                group("g1", false, &["x1"]),
                group("g2", false, &["x0"]),
            ],
            &options,
        )
        .unwrap();
        // `x0` is declared first but its group comes after `x1`'s.
        let raw = vec![
            blur("x0", Some("S:x,0")),
            blur("x1", Some("S:x,1")),
            blur("x2", Some("S:x,2")),
        ];
        let graph = resolve_tokens(&raw, forest, &[], &options).unwrap();

        for id in ["x0", "x1"] {
            assert_eq!(layer_ids(&graph, id), vec!["x1", "x0"], "layers of {id}");
        }
        // Not filed in any group.
        assert_eq!(layer_ids(&graph, "x2"), vec!["x2"]);
        let authoritative: Vec<_> = ["x0", "x1", "x2"]
            .into_iter()
            .filter(|id| !graph.token(id).unwrap().is_virtual)
            .collect();
        assert_eq!(authoritative, vec!["x1", "x2"]);
    }

    #[test]
    fn test_layers_disabled_by_options() {
        let options = ResolveOptions::default().with_layers(false);
        let graph =
            resolve_tokens(&[blur("x", Some("S:x,0"))], GroupForest::new(), &[], &options)
                .unwrap();
        assert!(graph.token("x").unwrap().layers.is_empty());
    }
}
