//! Structural equality over token values.
//!
//! Two values are equal when both are absent, both alias the same target
//! id, or their literal sub-values are recursively equal. Arena handles and
//! link scopes are ignored, so values from independent resolutions (or from
//! a theme and its base) compare by content. Colors compare by hex only.

use crate::model::{
    Aliasable, Blur, Border, Color, Font, Gradient, GradientStop, Measure, Point, Radius, Shadow,
    TokenValue, Typography,
};

/// Content equality that ignores identity.
pub trait StructuralEq {
    fn structural_eq(&self, other: &Self) -> bool;
}

impl<T: StructuralEq> StructuralEq for Aliasable<T> {
    fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Aliasable::Alias(a), Aliasable::Alias(b)) => a.id == b.id,
            (Aliasable::Literal(a), Aliasable::Literal(b)) => a.structural_eq(b),
            _ => false,
        }
    }
}

impl<T: StructuralEq> StructuralEq for Option<T> {
    fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.structural_eq(b),
            _ => false,
        }
    }
}

impl<T: StructuralEq> StructuralEq for [T] {
    fn structural_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.structural_eq(b))
    }
}

impl StructuralEq for String {
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl StructuralEq for Color {
    fn structural_eq(&self, other: &Self) -> bool {
        self.hex.eq_ignore_ascii_case(&other.hex)
    }
}

impl StructuralEq for Measure {
    fn structural_eq(&self, other: &Self) -> bool {
        self.measure == other.measure && self.unit == other.unit
    }
}

impl StructuralEq for Font {
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl StructuralEq for Point {
    fn structural_eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl StructuralEq for Typography {
    fn structural_eq(&self, other: &Self) -> bool {
        self.font.structural_eq(&other.font)
            && self.font_size.structural_eq(&other.font_size)
            && self.letter_spacing.structural_eq(&other.letter_spacing)
            && self.paragraph_indent.structural_eq(&other.paragraph_indent)
            && self.paragraph_spacing.structural_eq(&other.paragraph_spacing)
            && self.line_height.structural_eq(&other.line_height)
            && self.text_case == other.text_case
            && self.text_decoration == other.text_decoration
    }
}

impl StructuralEq for Radius {
    fn structural_eq(&self, other: &Self) -> bool {
        self.radius.structural_eq(&other.radius)
            && self.top_left.structural_eq(&other.top_left)
            && self.top_right.structural_eq(&other.top_right)
            && self.bottom_left.structural_eq(&other.bottom_left)
            && self.bottom_right.structural_eq(&other.bottom_right)
    }
}

impl StructuralEq for Border {
    fn structural_eq(&self, other: &Self) -> bool {
        self.color.structural_eq(&other.color)
            && self.width.structural_eq(&other.width)
            && self.position == other.position
    }
}

impl StructuralEq for Shadow {
    fn structural_eq(&self, other: &Self) -> bool {
        self.color.structural_eq(&other.color)
            && self.x.structural_eq(&other.x)
            && self.y.structural_eq(&other.y)
            && self.spread.structural_eq(&other.spread)
            && self.radius.structural_eq(&other.radius)
            && self.opacity == other.opacity
            && self.shadow_type == other.shadow_type
    }
}

impl StructuralEq for GradientStop {
    fn structural_eq(&self, other: &Self) -> bool {
        self.position == other.position && self.color.structural_eq(&other.color)
    }
}

impl StructuralEq for Gradient {
    fn structural_eq(&self, other: &Self) -> bool {
        self.from.structural_eq(&other.from)
            && self.to.structural_eq(&other.to)
            && self.gradient_type == other.gradient_type
            && self.aspect_ratio == other.aspect_ratio
            && self.stops.structural_eq(&other.stops)
    }
}

impl StructuralEq for Blur {
    fn structural_eq(&self, other: &Self) -> bool {
        self.blur_type == other.blur_type && self.radius.structural_eq(&other.radius)
    }
}

impl StructuralEq for TokenValue {
    fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TokenValue::Color(a), TokenValue::Color(b)) => a.structural_eq(b),
            (TokenValue::Measure(a), TokenValue::Measure(b)) => a.structural_eq(b),
            (TokenValue::Font(a), TokenValue::Font(b)) => a.structural_eq(b),
            (TokenValue::Text(a), TokenValue::Text(b)) => a.structural_eq(b),
            (TokenValue::Generic(a), TokenValue::Generic(b)) => a.structural_eq(b),
            (TokenValue::Typography(a), TokenValue::Typography(b)) => a.structural_eq(b),
            (TokenValue::Radius(a), TokenValue::Radius(b)) => a.structural_eq(b),
            (TokenValue::Shadow(a), TokenValue::Shadow(b)) => a.structural_eq(b),
            (TokenValue::Border(a), TokenValue::Border(b)) => a.structural_eq(b),
            (TokenValue::Gradient(a), TokenValue::Gradient(b)) => a.structural_eq(b),
            (TokenValue::Blur(a), TokenValue::Blur(b)) => a.structural_eq(b),
            _ => false,
        }
    }
}

fn is_equal<T: StructuralEq>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.structural_eq(b),
        _ => false,
    }
}

/// Compares two optional token values of any kind. Values of different
/// kinds are never equal.
pub fn is_equal_token_value(a: Option<&TokenValue>, b: Option<&TokenValue>) -> bool {
    is_equal(a, b)
}

pub fn is_equal_color_token_value(
    a: Option<&Aliasable<Color>>,
    b: Option<&Aliasable<Color>>,
) -> bool {
    is_equal(a, b)
}

pub fn is_equal_measure_token_value(
    a: Option<&Aliasable<Measure>>,
    b: Option<&Aliasable<Measure>>,
) -> bool {
    is_equal(a, b)
}

pub fn is_equal_font_token_value(a: Option<&Aliasable<Font>>, b: Option<&Aliasable<Font>>) -> bool {
    is_equal(a, b)
}

/// Covers both text and generic values.
pub fn is_equal_text_token_value(
    a: Option<&Aliasable<String>>,
    b: Option<&Aliasable<String>>,
) -> bool {
    is_equal(a, b)
}

pub fn is_equal_typography_token_value(
    a: Option<&Aliasable<Typography>>,
    b: Option<&Aliasable<Typography>>,
) -> bool {
    is_equal(a, b)
}

pub fn is_equal_radius_token_value(
    a: Option<&Aliasable<Radius>>,
    b: Option<&Aliasable<Radius>>,
) -> bool {
    is_equal(a, b)
}

pub fn is_equal_shadow_token_value(
    a: Option<&Aliasable<Shadow>>,
    b: Option<&Aliasable<Shadow>>,
) -> bool {
    is_equal(a, b)
}

pub fn is_equal_border_token_value(
    a: Option<&Aliasable<Border>>,
    b: Option<&Aliasable<Border>>,
) -> bool {
    is_equal(a, b)
}

pub fn is_equal_gradient_token_value(
    a: Option<&Aliasable<Gradient>>,
    b: Option<&Aliasable<Gradient>>,
) -> bool {
    is_equal(a, b)
}

pub fn is_equal_blur_token_value(a: Option<&Aliasable<Blur>>, b: Option<&Aliasable<Blur>>) -> bool {
    is_equal(a, b)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::{
        BlurType, BorderPosition, GradientType, ShadowType, TextCase, TextDecoration, TokenIdx,
        TokenRef, Unit,
    };

    fn link(id: &str, slot: usize) -> TokenRef {
        TokenRef::base(id.into(), TokenIdx::new(slot))
    }

    fn px(v: f64) -> Aliasable<Measure> {
        Aliasable::Literal(Measure {
            measure: v,
            unit: Unit::Pixels,
        })
    }

    fn color(hex: &str) -> Aliasable<Color> {
        Aliasable::Literal(Color::from_hex(hex).unwrap())
    }

    fn typography(size: f64) -> Typography {
        Typography {
            font: Aliasable::Literal(Font {
                family: "Inter".to_string(),
                subfamily: "Regular".to_string(),
            }),
            font_size: px(size),
            letter_spacing: px(0.0),
            paragraph_indent: px(0.0),
            paragraph_spacing: px(0.0),
            line_height: None,
            text_case: TextCase::Original,
            text_decoration: TextDecoration::None,
        }
    }

    #[test]
    fn test_both_absent_are_equal() {
        assert!(is_equal_color_token_value(None, None));
        assert!(is_equal_token_value(None, None));
        assert!(!is_equal_color_token_value(Some(&color("000000")), None));
    }

    #[test]
    fn test_aliases_compare_by_target_id() {
        let a: Aliasable<Color> = Aliasable::Alias(link("brand", 0));
        let b: Aliasable<Color> = Aliasable::Alias(link("brand", 7));
        let c: Aliasable<Color> = Aliasable::Alias(link("other", 0));
        assert!(is_equal_color_token_value(Some(&a), Some(&b)));
        assert!(!is_equal_color_token_value(Some(&a), Some(&c)));
        assert!(!is_equal_color_token_value(Some(&a), Some(&color("ff0000ff"))));
    }

    #[test]
    fn test_colors_compare_by_hex() {
        assert!(is_equal_color_token_value(Some(&color("ff0000")), Some(&color("#FF0000FF"))));
        assert!(!is_equal_color_token_value(Some(&color("ff0000ff")), Some(&color("ff0001ff"))));
    }

    #[test]
    fn test_measure_unit_matters() {
        let rem = Aliasable::Literal(Measure {
            measure: 1.0,
            unit: Unit::Rems,
        });
        assert!(!is_equal_measure_token_value(Some(&px(1.0)), Some(&rem)));
        assert!(is_equal_measure_token_value(Some(&px(1.0)), Some(&px(1.0))));
    }

    #[test]
    fn test_typography_recurses_into_slots() {
        let a = Aliasable::Literal(typography(16.0));
        let b = Aliasable::Literal(typography(16.0));
        let c = Aliasable::Literal(typography(18.0));
        assert!(is_equal_typography_token_value(Some(&a), Some(&b)));
        assert!(!is_equal_typography_token_value(Some(&a), Some(&c)));

        let mut d = typography(16.0);
        d.text_case = TextCase::Upper;
        assert!(!is_equal_typography_token_value(Some(&a), Some(&Aliasable::Literal(d))));
    }

    #[test]
    fn test_nested_alias_inside_border() {
        let border = |target: &str, slot: usize| {
            Aliasable::Literal(Border {
                color: Aliasable::Alias(link(target, slot)),
                width: px(1.0),
                position: BorderPosition::Inside,
            })
        };
        assert!(is_equal_border_token_value(Some(&border("black", 1)), Some(&border("black", 9))));
        assert!(!is_equal_border_token_value(Some(&border("black", 1)), Some(&border("white", 1))));
    }

    #[test]
    fn test_gradient_stops_order_matters() {
        let stop = |p: f64, hex: &str| GradientStop {
            position: p,
            color: color(hex),
        };
        let gradient = |stops: Vec<GradientStop>| {
            Aliasable::Literal(Gradient {
                from: Point { x: 0.0, y: 0.0 },
                to: Point { x: 1.0, y: 1.0 },
                gradient_type: GradientType::Linear,
                aspect_ratio: 1.0,
                stops,
            })
        };
        let a = gradient(vec![stop(0.0, "000000"), stop(1.0, "ffffff")]);
        let b = gradient(vec![stop(1.0, "ffffff"), stop(0.0, "000000")]);
        assert!(!is_equal_gradient_token_value(Some(&a), Some(&b)));
        assert!(is_equal_gradient_token_value(Some(&a), Some(&a.clone())));
    }

    #[test]
    fn test_different_kinds_never_equal() {
        let text = TokenValue::Text(Aliasable::Literal("x".to_string()));
        let generic = TokenValue::Generic(Aliasable::Literal("x".to_string()));
        assert!(!is_equal_token_value(Some(&text), Some(&generic)));

        let blur = TokenValue::Blur(Aliasable::Literal(Blur {
            blur_type: BlurType::Layer,
            radius: px(4.0),
        }));
        assert!(is_equal_token_value(Some(&blur), Some(&blur.clone())));
    }

    fn arb_measure() -> impl Strategy<Value = Aliasable<Measure>> {
        prop_oneof![
            (-1.0e6f64..1.0e6).prop_map(px),
            "[a-z]{1,8}".prop_map(|id| Aliasable::Alias(link(&id, 0))),
        ]
    }

    fn arb_shadow() -> impl Strategy<Value = TokenValue> {
        (any::<[u8; 4]>(), arb_measure(), arb_measure(), 0.0f64..=1.0).prop_map(
            |([r, g, b, a], x, y, opacity)| {
                TokenValue::Shadow(Aliasable::Literal(Shadow {
                    color: Aliasable::Literal(Color::from_rgba(r, g, b, a)),
                    x,
                    y,
                    spread: px(0.0),
                    radius: px(2.0),
                    opacity,
                    shadow_type: ShadowType::Drop,
                }))
            },
        )
    }

    proptest! {
        #[test]
        fn test_comparator_is_reflexive(value in arb_shadow()) {
            prop_assert!(is_equal_token_value(Some(&value), Some(&value.clone())));
        }

        #[test]
        fn test_comparator_is_symmetric(a in arb_shadow(), b in arb_shadow()) {
            prop_assert_eq!(
                is_equal_token_value(Some(&a), Some(&b)),
                is_equal_token_value(Some(&b), Some(&a))
            );
        }
    }
}
