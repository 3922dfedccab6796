//! Benchmark for design-token resolution.
//!
//! Resolves a persisted bundle (`RawDesignSystem` JSON) given as the first
//! argument, or a synthetic one when no path is given. Set `RUST_LOG` to see
//! resolver phases.

use std::fs;
use std::time::Instant;

use design_tokens::codec::{
    RawDesignSystem, RawGroup, RawMeta, RawOrigin, RawTheme, RawThemeOverride, RawToken,
    RawTokenData,
};
use design_tokens::{ResolveOptions, TokenKind, resolve_design_system};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const BRAND: &str = "bench-brand";
const VERSION: &str = "bench-version";

// =============================================================================
// SYNTHETIC BUNDLE
// =============================================================================

fn meta(name: String) -> RawMeta {
    RawMeta {
        name,
        description: String::new(),
    }
}

fn raw_token(persistent_id: &str, kind: TokenKind, name: String, data: RawTokenData) -> RawToken {
    RawToken {
        id: Uuid::new_v4().to_string(),
        brand_id: BRAND.to_string(),
        design_system_version_id: VERSION.to_string(),
        persistent_id: persistent_id.to_string(),
        token_type: kind.as_str().to_string(),
        meta: meta(name),
        origin_style: None,
        data,
        custom_property_overrides: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

fn raw_group(
    id: &str,
    kind: TokenKind,
    is_root: bool,
    name: &str,
    children: Vec<String>,
) -> RawGroup {
    RawGroup {
        persistent_id: id.to_string(),
        brand_id: BRAND.to_string(),
        token_type: kind.as_str().to_string(),
        is_root,
        meta: meta(name.to_string()),
        children_ids: children,
    }
}

/// Builds `colors` literal colors, an alias for every second color (each
/// pointing at an earlier color or alias), three-layer shadow stacks and a
/// theme overriding every tenth color.
fn synthetic(colors: usize) -> RawDesignSystem {
    let mut tokens = Vec::new();
    let mut color_ids = Vec::with_capacity(colors);
    let mut alias_ids: Vec<String> = Vec::new();

    for i in 0..colors {
        let id = Uuid::now_v7().to_string();
        let hex = format!("{:06x}ff", i.wrapping_mul(2_654_435_761) & 0xff_ffff);
        let data = RawTokenData::literal(json!(hex));
        tokens.push(raw_token(&id, TokenKind::Color, format!("color-{i}"), data));
        color_ids.push(id);
    }
    for i in (1..colors).step_by(2) {
        let id = Uuid::now_v7().to_string();
        let target = if alias_ids.is_empty() || i % 3 == 0 {
            color_ids[i - 1].clone()
        } else {
            alias_ids[(i * 7) % alias_ids.len()].clone()
        };
        let data = RawTokenData::alias(target);
        tokens.push(raw_token(&id, TokenKind::Color, format!("alias-{i}"), data));
        alias_ids.push(id);
    }

    let mut shadow_ids = Vec::new();
    for stack in 0..(colors / 30).max(1) {
        let origin = format!("S:{},", Uuid::new_v4().simple());
        for layer in 0..3 {
            let id = Uuid::now_v7().to_string();
            let color = &color_ids[(stack * 3 + layer) % color_ids.len().max(1)];
            let mut token = raw_token(
                &id,
                TokenKind::Shadow,
                format!("elevation-{stack}"),
                RawTokenData::literal(json!({
                    "color": { "aliasTo": color },
                    "x": { "value": { "measure": 0, "unit": "Pixels" } },
                    "y": { "value": { "measure": layer + 1, "unit": "Pixels" } },
                    "radius": { "value": { "measure": 2 * layer + 2, "unit": "Pixels" } },
                    "spread": { "value": { "measure": 0, "unit": "Pixels" } },
                    "opacity": 0.2
                })),
            );
            token.origin_style = Some(RawOrigin {
                id: Some(format!("{origin}{layer}")),
                name: Some(format!("elevation-{stack}")),
                source_id: None,
            });
            tokens.push(token);
            shadow_ids.push(id);
        }
    }

    let color_children = vec!["palette".to_string(), "aliases".to_string()];
    let groups = vec![
        raw_group("colors", TokenKind::Color, true, "Colors", color_children),
        raw_group("palette", TokenKind::Color, false, "Palette", color_ids.clone()),
        raw_group("aliases", TokenKind::Color, false, "Aliases", alias_ids),
        raw_group("shadows", TokenKind::Shadow, true, "Shadows", shadow_ids),
    ];

    let overrides = color_ids
        .iter()
        .step_by(10)
        .map(|id| RawThemeOverride {
            token_persistent_id: id.clone(),
            token_type: TokenKind::Color.as_str().to_string(),
            origin: None,
            data: RawTokenData::literal(json!("000000ff")),
        })
        .collect();

    RawDesignSystem {
        tokens,
        groups,
        properties: Vec::new(),
        themes: vec![RawTheme {
            id: "dark".to_string(),
            brand_id: BRAND.to_string(),
            meta: meta("Dark".to_string()),
            overrides,
        }],
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let raw = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading design system from: {}", path);
            let json_data = fs::read_to_string(&path).expect("Failed to read bundle");
            let parse_start = Instant::now();
            let raw: RawDesignSystem =
                serde_json::from_str(&json_data).expect("Failed to parse JSON");
            println!("Parsed bundle in {:?}", parse_start.elapsed());
            raw
        }
        None => {
            let build_start = Instant::now();
            let raw = synthetic(20_000);
            println!("Generated synthetic bundle in {:?}", build_start.elapsed());
            raw
        }
    };

    println!(
        "  - {} tokens, {} groups, {} themes",
        raw.tokens.len(),
        raw.groups.len(),
        raw.themes.len()
    );

    let options = ResolveOptions::default();
    let mut timings = Vec::new();
    let mut resolved = None;
    for _ in 0..5 {
        let start = Instant::now();
        let result = resolve_design_system(&raw, &options).expect("Failed to resolve");
        timings.push(start.elapsed());
        resolved = Some(result);
    }
    timings.sort();

    println!("\n=== Resolution ===");
    println!("Min:    {:?}", timings[0]);
    println!("Median: {:?}", timings[timings.len() / 2]);
    println!("Max:    {:?}", timings[timings.len() - 1]);

    if let Some(resolved) = resolved {
        let aliases = resolved.graph.tokens().iter().filter(|t| t.value.is_alias()).count();
        let virtual_layers = resolved.graph.tokens().iter().filter(|t| t.is_virtual).count();
        let replicas: usize = resolved.themes.iter().map(|t| t.len()).sum();
        info!(aliases, virtual_layers, replicas, "resolved graph");
        println!("\n=== Graph ===");
        println!("Tokens:         {}", resolved.graph.len());
        println!("Aliases:        {}", aliases);
        println!("Virtual layers: {}", virtual_layers);
        println!("Theme replicas: {}", replicas);
    }
}
