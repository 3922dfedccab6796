//! Value decoding/encoding for persisted token payloads.
//!
//! Decoding turns a raw `data.value` payload into a typed [`TokenValue`];
//! nested aliases are handed to a [`LinkResolver`] so the caller decides
//! which arena the link points into. Encoding is the inverse and produces
//! the raw `data` shape a writer persists.

use serde::Deserialize;
use serde_json::{Value as Json, json};

use crate::error::ResolveError;
use crate::limits::MAX_GRADIENT_STOPS;
use crate::model::{
    Aliasable, Blur, BlurType, Border, BorderPosition, Color, Font, Gradient, GradientStop,
    GradientType, Id, Measure, Point, Radius, Shadow, ShadowType, TextCase, TextDecoration,
    TokenKind, TokenRef, TokenValue, Typography, Unit,
};

use super::raw::{
    RawBlur, RawBorder, RawFont, RawGradient, RawMeasure, RawRadius, RawShadow, RawSlot,
    RawTokenData, RawTypography,
};

/// Resolves nested (sub-component) aliases while decoding a compound value.
pub trait LinkResolver {
    /// Links `owner`'s sub-component to the token `target`, which must be of
    /// kind `expected`.
    fn link(&mut self, owner: &Id, target: &str, expected: TokenKind)
    -> Result<TokenRef, ResolveError>;
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a literal payload of the given kind.
pub fn decode_literal(
    kind: TokenKind,
    owner: &Id,
    value: &Json,
    links: &mut dyn LinkResolver,
) -> Result<TokenValue, ResolveError> {
    match kind {
        TokenKind::Color => Ok(TokenValue::Color(Aliasable::Literal(decode_color(
            owner, value,
        )?))),
        TokenKind::Measure => {
            let raw = parse::<RawMeasure>(owner, value, "measure")?;
            Ok(TokenValue::Measure(Aliasable::Literal(decode_measure(
                owner, &raw, "measure",
            )?)))
        }
        TokenKind::Font => {
            let raw = parse::<RawFont>(owner, value, "font")?;
            Ok(TokenValue::Font(Aliasable::Literal(decode_font(&raw))))
        }
        TokenKind::Text => Ok(TokenValue::Text(Aliasable::Literal(decode_text(value)))),
        TokenKind::Generic => Ok(TokenValue::Generic(Aliasable::Literal(decode_text(value)))),
        TokenKind::Typography => {
            let raw = parse::<RawTypography>(owner, value, "typography")?;
            Ok(TokenValue::Typography(Aliasable::Literal(
                decode_typography(owner, &raw, links)?,
            )))
        }
        TokenKind::Radius => {
            let raw = parse::<RawRadius>(owner, value, "radius")?;
            Ok(TokenValue::Radius(Aliasable::Literal(decode_radius(
                owner, &raw, links,
            )?)))
        }
        TokenKind::Shadow => {
            let raw = parse::<RawShadow>(owner, value, "shadow")?;
            Ok(TokenValue::Shadow(Aliasable::Literal(decode_shadow(
                owner, &raw, links,
            )?)))
        }
        TokenKind::Border => {
            let raw = parse::<RawBorder>(owner, value, "border")?;
            Ok(TokenValue::Border(Aliasable::Literal(decode_border(
                owner, &raw, links,
            )?)))
        }
        TokenKind::Gradient => {
            let raw = parse::<RawGradient>(owner, value, "gradient")?;
            Ok(TokenValue::Gradient(Aliasable::Literal(decode_gradient(
                owner, &raw, links,
            )?)))
        }
        TokenKind::Blur => {
            let raw = parse::<RawBlur>(owner, value, "blur")?;
            Ok(TokenValue::Blur(Aliasable::Literal(decode_blur(
                owner, &raw, links,
            )?)))
        }
    }
}

fn parse<'a, T: Deserialize<'a>>(
    owner: &Id,
    value: &'a Json,
    field: &'static str,
) -> Result<T, ResolveError> {
    T::deserialize(value).map_err(|e| ResolveError::InvalidValue {
        id: owner.clone(),
        field,
        reason: e.to_string(),
    })
}

fn invalid(owner: &Id, field: &'static str, reason: impl Into<String>) -> ResolveError {
    ResolveError::InvalidValue {
        id: owner.clone(),
        field,
        reason: reason.into(),
    }
}

fn decode_color(owner: &Id, value: &Json) -> Result<Color, ResolveError> {
    let hex = value
        .as_str()
        .ok_or_else(|| invalid(owner, "color", "expected a hex string"))?;
    Color::from_hex(hex).ok_or_else(|| invalid(owner, "color", format!("bad hex {hex:?}")))
}

fn decode_color_str(owner: &Id, hex: &str) -> Result<Color, ResolveError> {
    Color::from_hex(hex).ok_or_else(|| invalid(owner, "color", format!("bad hex {hex:?}")))
}

fn decode_measure(
    owner: &Id,
    raw: &RawMeasure,
    field: &'static str,
) -> Result<Measure, ResolveError> {
    if !raw.measure.is_finite() {
        return Err(invalid(owner, field, "measure is not finite"));
    }
    let unit = Unit::from_name(&raw.unit)
        .ok_or_else(|| invalid(owner, field, format!("unknown unit {:?}", raw.unit)))?;
    Ok(Measure {
        measure: raw.measure,
        unit,
    })
}

fn decode_font(raw: &RawFont) -> Font {
    Font {
        family: raw.family.clone(),
        subfamily: raw.subfamily.clone(),
    }
}

fn decode_text(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decodes one nested slot: alias wins over a co-present literal.
fn decode_slot<R, T>(
    owner: &Id,
    slot: &RawSlot<R>,
    field: &'static str,
    expected: TokenKind,
    links: &mut dyn LinkResolver,
    convert: impl FnOnce(&R) -> Result<T, ResolveError>,
) -> Result<Aliasable<T>, ResolveError> {
    if let Some(target) = slot.alias_target() {
        return Ok(Aliasable::Alias(links.link(owner, target, expected)?));
    }
    match &slot.value {
        Some(raw) => Ok(Aliasable::Literal(convert(raw)?)),
        None => Err(invalid(owner, field, "neither value nor alias")),
    }
}

fn measure_slot(
    owner: &Id,
    slot: &RawSlot<RawMeasure>,
    field: &'static str,
    links: &mut dyn LinkResolver,
) -> Result<Aliasable<Measure>, ResolveError> {
    decode_slot(owner, slot, field, TokenKind::Measure, links, |raw| {
        decode_measure(owner, raw, field)
    })
}

fn optional_measure_slot(
    owner: &Id,
    slot: Option<&RawSlot<RawMeasure>>,
    field: &'static str,
    links: &mut dyn LinkResolver,
) -> Result<Option<Aliasable<Measure>>, ResolveError> {
    match slot {
        // An empty slot or an empty `aliasTo` means "not set".
        Some(s) if !s.is_unset() => Ok(Some(measure_slot(owner, s, field, links)?)),
        _ => Ok(None),
    }
}

fn color_slot(
    owner: &Id,
    slot: &RawSlot<String>,
    field: &'static str,
    links: &mut dyn LinkResolver,
) -> Result<Aliasable<Color>, ResolveError> {
    decode_slot(owner, slot, field, TokenKind::Color, links, |hex| {
        decode_color_str(owner, hex)
    })
}

fn decode_typography(
    owner: &Id,
    raw: &RawTypography,
    links: &mut dyn LinkResolver,
) -> Result<Typography, ResolveError> {
    let font = decode_slot(owner, &raw.font, "font", TokenKind::Font, links, |f| {
        Ok(decode_font(f))
    })?;
    let text_case = TextCase::from_name(&raw.text_case)
        .ok_or_else(|| invalid(owner, "textCase", format!("unknown case {:?}", raw.text_case)))?;
    let text_decoration = TextDecoration::from_name(&raw.text_decoration).ok_or_else(|| {
        invalid(
            owner,
            "textDecoration",
            format!("unknown decoration {:?}", raw.text_decoration),
        )
    })?;

    Ok(Typography {
        font,
        font_size: measure_slot(owner, &raw.font_size, "fontSize", links)?,
        letter_spacing: measure_slot(owner, &raw.letter_spacing, "letterSpacing", links)?,
        paragraph_indent: measure_slot(owner, &raw.paragraph_indent, "paragraphIndent", links)?,
        paragraph_spacing: measure_slot(owner, &raw.paragraph_spacing, "paragraphSpacing", links)?,
        line_height: optional_measure_slot(owner, raw.line_height.as_ref(), "lineHeight", links)?,
        text_case,
        text_decoration,
    })
}

fn decode_radius(
    owner: &Id,
    raw: &RawRadius,
    links: &mut dyn LinkResolver,
) -> Result<Radius, ResolveError> {
    Ok(Radius {
        radius: measure_slot(owner, &raw.radius, "radius", links)?,
        top_left: optional_measure_slot(owner, raw.top_left.as_ref(), "topLeft", links)?,
        top_right: optional_measure_slot(owner, raw.top_right.as_ref(), "topRight", links)?,
        bottom_left: optional_measure_slot(owner, raw.bottom_left.as_ref(), "bottomLeft", links)?,
        bottom_right: optional_measure_slot(
            owner,
            raw.bottom_right.as_ref(),
            "bottomRight",
            links,
        )?,
    })
}

fn decode_border(
    owner: &Id,
    raw: &RawBorder,
    links: &mut dyn LinkResolver,
) -> Result<Border, ResolveError> {
    let position = BorderPosition::from_name(&raw.position)
        .ok_or_else(|| invalid(owner, "position", format!("unknown position {:?}", raw.position)))?;
    Ok(Border {
        color: color_slot(owner, &raw.color, "color", links)?,
        width: measure_slot(owner, &raw.width, "width", links)?,
        position,
    })
}

fn decode_shadow(
    owner: &Id,
    raw: &RawShadow,
    links: &mut dyn LinkResolver,
) -> Result<Shadow, ResolveError> {
    let shadow_type = ShadowType::from_name(&raw.shadow_type).ok_or_else(|| {
        invalid(owner, "type", format!("unknown shadow type {:?}", raw.shadow_type))
    })?;
    if !raw.opacity.is_finite() {
        return Err(invalid(owner, "opacity", "opacity is not finite"));
    }
    Ok(Shadow {
        color: color_slot(owner, &raw.color, "color", links)?,
        x: measure_slot(owner, &raw.x, "x", links)?,
        y: measure_slot(owner, &raw.y, "y", links)?,
        spread: measure_slot(owner, &raw.spread, "spread", links)?,
        radius: measure_slot(owner, &raw.radius, "radius", links)?,
        opacity: raw.opacity,
        shadow_type,
    })
}

fn decode_gradient(
    owner: &Id,
    raw: &RawGradient,
    links: &mut dyn LinkResolver,
) -> Result<Gradient, ResolveError> {
    let gradient_type = GradientType::from_name(&raw.gradient_type).ok_or_else(|| {
        invalid(
            owner,
            "type",
            format!("unknown gradient type {:?}", raw.gradient_type),
        )
    })?;
    if raw.stops.len() > MAX_GRADIENT_STOPS {
        return Err(ResolveError::LengthExceedsLimit {
            field: "gradient stops",
            len: raw.stops.len(),
            max: MAX_GRADIENT_STOPS,
        });
    }

    let mut stops = Vec::with_capacity(raw.stops.len());
    for stop in &raw.stops {
        stops.push(GradientStop {
            position: stop.position,
            color: color_slot(owner, &stop.color, "stop color", links)?,
        });
    }

    Ok(Gradient {
        from: Point {
            x: raw.from.x,
            y: raw.from.y,
        },
        to: Point {
            x: raw.to.x,
            y: raw.to.y,
        },
        gradient_type,
        aspect_ratio: raw.aspect_ratio,
        stops,
    })
}

fn decode_blur(
    owner: &Id,
    raw: &RawBlur,
    links: &mut dyn LinkResolver,
) -> Result<Blur, ResolveError> {
    let blur_type = BlurType::from_name(&raw.blur_type)
        .ok_or_else(|| invalid(owner, "type", format!("unknown blur type {:?}", raw.blur_type)))?;
    Ok(Blur {
        blur_type,
        radius: measure_slot(owner, &raw.radius, "radius", links)?,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a value into the raw `data` shape.
///
/// A top-level alias is written as `aliasTo` only; nested aliases are
/// written as nested `aliasTo` slots.
pub fn encode_token_data(value: &TokenValue) -> RawTokenData {
    if let Some(target) = value.referenced_token() {
        return RawTokenData::alias(target.id.to_string());
    }
    RawTokenData::literal(encode_literal(value))
}

fn encode_literal(value: &TokenValue) -> Json {
    match value {
        TokenValue::Color(Aliasable::Literal(c)) => Json::String(c.hex.clone()),
        TokenValue::Measure(Aliasable::Literal(m)) => encode_measure(m),
        TokenValue::Font(Aliasable::Literal(f)) => encode_font(f),
        TokenValue::Text(Aliasable::Literal(s)) | TokenValue::Generic(Aliasable::Literal(s)) => {
            Json::String(s.clone())
        }
        TokenValue::Typography(Aliasable::Literal(t)) => {
            let mut out = json!({
                "font": encode_slot(&t.font, encode_font),
                "fontSize": encode_slot(&t.font_size, encode_measure),
                "letterSpacing": encode_slot(&t.letter_spacing, encode_measure),
                "paragraphIndent": encode_slot(&t.paragraph_indent, encode_measure),
                "paragraphSpacing": encode_slot(&t.paragraph_spacing, encode_measure),
                "textCase": t.text_case.as_str(),
                "textDecoration": t.text_decoration.as_str(),
            });
            if let Some(line_height) = &t.line_height {
                out["lineHeight"] = encode_slot(line_height, encode_measure);
            }
            out
        }
        TokenValue::Radius(Aliasable::Literal(r)) => {
            let mut out = json!({ "radius": encode_slot(&r.radius, encode_measure) });
            let corners = [
                ("topLeft", &r.top_left),
                ("topRight", &r.top_right),
                ("bottomLeft", &r.bottom_left),
                ("bottomRight", &r.bottom_right),
            ];
            for (key, corner) in corners {
                if let Some(corner) = corner {
                    out[key] = encode_slot(corner, encode_measure);
                }
            }
            out
        }
        TokenValue::Border(Aliasable::Literal(b)) => json!({
            "color": encode_slot(&b.color, encode_color),
            "width": encode_slot(&b.width, encode_measure),
            "position": b.position.as_str(),
        }),
        TokenValue::Shadow(Aliasable::Literal(s)) => json!({
            "color": encode_slot(&s.color, encode_color),
            "x": encode_slot(&s.x, encode_measure),
            "y": encode_slot(&s.y, encode_measure),
            "radius": encode_slot(&s.radius, encode_measure),
            "spread": encode_slot(&s.spread, encode_measure),
            "opacity": s.opacity,
            "type": s.shadow_type.as_str(),
        }),
        TokenValue::Gradient(Aliasable::Literal(g)) => json!({
            "from": { "x": g.from.x, "y": g.from.y },
            "to": { "x": g.to.x, "y": g.to.y },
            "type": g.gradient_type.as_str(),
            "aspectRatio": g.aspect_ratio,
            "stops": g.stops.iter().map(|stop| json!({
                "position": stop.position,
                "color": encode_slot(&stop.color, encode_color),
            })).collect::<Vec<_>>(),
        }),
        TokenValue::Blur(Aliasable::Literal(b)) => json!({
            "type": b.blur_type.as_str(),
            "radius": encode_slot(&b.radius, encode_measure),
        }),
        // Top-level aliases are handled by the caller.
        _ => Json::Null,
    }
}

fn encode_slot<T>(slot: &Aliasable<T>, encode: fn(&T) -> Json) -> Json {
    match slot {
        Aliasable::Literal(v) => json!({ "value": encode(v) }),
        Aliasable::Alias(r) => json!({ "aliasTo": r.id.as_ref() }),
    }
}

fn encode_color(color: &Color) -> Json {
    Json::String(color.hex.clone())
}

fn encode_measure(measure: &Measure) -> Json {
    json!({ "measure": measure.measure, "unit": measure.unit.as_str() })
}

fn encode_font(font: &Font) -> Json {
    json!({ "family": font.family, "subfamily": font.subfamily })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::TokenIdx;

    /// Links against a fixed table of (id -> kind, index).
    struct FixedLinks(HashMap<&'static str, (TokenKind, usize)>);

    impl LinkResolver for FixedLinks {
        fn link(
            &mut self,
            owner: &Id,
            target: &str,
            expected: TokenKind,
        ) -> Result<TokenRef, ResolveError> {
            let (kind, index) =
                self.0
                    .get(target)
                    .copied()
                    .ok_or_else(|| ResolveError::DanglingReference {
                        from: owner.clone(),
                        target: target.into(),
                    })?;
            if kind != expected {
                return Err(ResolveError::KindMismatch {
                    from: owner.clone(),
                    target: target.into(),
                    expected,
                    found: kind,
                });
            }
            Ok(TokenRef::base(target.into(), TokenIdx::new(index)))
        }
    }

    fn links() -> FixedLinks {
        FixedLinks(HashMap::from([
            ("black", (TokenKind::Color, 0)),
            ("space-2", (TokenKind::Measure, 1)),
            ("inter", (TokenKind::Font, 2)),
        ]))
    }

    fn owner() -> Id {
        "owner".into()
    }

    #[test]
    fn test_decode_color_literal() {
        let value = decode_literal(TokenKind::Color, &owner(), &json!("ff0000ff"), &mut links())
            .unwrap();
        assert_eq!(value, TokenValue::Color(Aliasable::Literal(Color::from_rgba(255, 0, 0, 255))));
    }

    #[test]
    fn test_decode_color_rejects_non_string() {
        let err = decode_literal(TokenKind::Color, &owner(), &json!(12), &mut links()).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidValue { field: "color", .. }));
    }

    #[test]
    fn test_decode_measure_unknown_unit() {
        let err = decode_literal(
            TokenKind::Measure,
            &owner(),
            &json!({ "measure": 4, "unit": "Furlongs" }),
            &mut links(),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidValue { field: "measure", .. }));
    }

    #[test]
    fn test_decode_generic_non_string_keeps_json_text() {
        let value = decode_literal(TokenKind::Generic, &owner(), &json!(42), &mut links()).unwrap();
        assert_eq!(value, TokenValue::Generic(Aliasable::Literal("42".to_string())));
    }

    #[test]
    fn test_decode_shadow_mixed_slots() {
        let raw = json!({
            "color": { "aliasTo": "black" },
            "x": { "value": { "measure": 0, "unit": "Pixels" } },
            "y": { "aliasTo": "space-2" },
            "radius": { "value": { "measure": 8, "unit": "Pixels" } },
            "spread": { "value": { "measure": 0, "unit": "Pixels" } },
            "opacity": 0.5,
            "type": "Inner"
        });
        let value = decode_literal(TokenKind::Shadow, &owner(), &raw, &mut links()).unwrap();
        let TokenValue::Shadow(Aliasable::Literal(shadow)) = value else {
            panic!("expected literal shadow");
        };
        assert_eq!(shadow.color.reference().map(|r| &*r.id), Some("black"));
        assert_eq!(shadow.y.reference().map(|r| r.target), Some(TokenIdx::new(1)));
        assert_eq!(
            shadow.radius.literal(),
            Some(&Measure {
                measure: 8.0,
                unit: Unit::Pixels
            })
        );
        assert_eq!(shadow.shadow_type, ShadowType::Inner);
        assert_eq!(shadow.opacity, 0.5);
    }

    #[test]
    fn test_decode_sub_alias_kind_mismatch() {
        let raw = json!({
            "color": { "aliasTo": "space-2" },
            "width": { "value": { "measure": 1, "unit": "Pixels" } },
            "position": "Inside"
        });
        let err = decode_literal(TokenKind::Border, &owner(), &raw, &mut links()).unwrap_err();
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
    fn test_decode_empty_required_slot() {
        let raw = json!({
            "type": "Layer",
            "radius": {}
        });
        let err = decode_literal(TokenKind::Blur, &owner(), &raw, &mut links()).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidValue { field: "radius", .. }));
    }

    #[test]
    fn test_decode_typography_optional_line_height() {
        let raw = json!({
            "font": { "aliasTo": "inter" },
            "fontSize": { "value": { "measure": 16, "unit": "Pixels" } },
            "letterSpacing": { "value": { "measure": 0, "unit": "Percent" } },
            "paragraphIndent": { "value": { "measure": 0, "unit": "Pixels" } },
            "paragraphSpacing": { "value": { "measure": 0, "unit": "Pixels" } },
            "lineHeight": {},
            "textCase": "Upper"
        });
        let value = decode_literal(TokenKind::Typography, &owner(), &raw, &mut links()).unwrap();
        let TokenValue::Typography(Aliasable::Literal(t)) = value else {
            panic!("expected literal typography");
        };
        assert!(t.font.is_alias());
        assert!(t.line_height.is_none());
        assert_eq!(t.text_case, TextCase::Upper);
        assert_eq!(t.text_decoration, TextDecoration::None);
    }

    #[test]
    fn test_decode_radius_empty_alias_is_unset() {
        let raw = json!({
            "radius": { "value": { "measure": 4, "unit": "Pixels" } },
            "topLeft": { "aliasTo": "" },
            "topRight": { "aliasTo": "", "value": { "measure": 2, "unit": "Pixels" } }
        });
        let value = decode_literal(TokenKind::Radius, &owner(), &raw, &mut links()).unwrap();
        let TokenValue::Radius(Aliasable::Literal(r)) = value else {
            panic!("expected literal radius");
        };
        assert!(r.top_left.is_none());
        assert!(matches!(r.top_right, Some(Aliasable::Literal(_))));
        assert!(r.bottom_left.is_none());
    }

    #[test]
    fn test_encode_alias_writes_only_alias_to() {
        let value = TokenValue::alias(
            TokenKind::Radius,
            TokenRef::base("radius-md".into(), TokenIdx::new(4)),
        );
        let data = encode_token_data(&value);
        assert_eq!(data.alias_to.as_deref(), Some("radius-md"));
        assert!(data.value.is_none());
    }

    #[test]
    fn test_encode_gradient_keeps_nested_alias() {
        let raw = json!({
            "from": { "x": 0.0, "y": 0.0 },
            "to": { "x": 1.0, "y": 1.0 },
            "type": "Linear",
            "aspectRatio": 1.0,
            "stops": [
                { "position": 0.0, "color": { "aliasTo": "black" } },
                { "position": 1.0, "color": { "value": "ffffffff" } }
            ]
        });
        let value = decode_literal(TokenKind::Gradient, &owner(), &raw, &mut links()).unwrap();
        let data = encode_token_data(&value);
        assert_eq!(data.value, Some(raw));
    }
}
