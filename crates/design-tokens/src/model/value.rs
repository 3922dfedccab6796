//! Value types for design tokens.
//!
//! Every token carries exactly one [`TokenValue`]. Each position that may
//! point at another token is an [`Aliasable`], which holds either a literal
//! or a link, never both.

use crate::model::TokenRef;

/// Token kinds (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Color,
    Measure,
    Font,
    Text,
    Generic,
    Typography,
    Radius,
    Shadow,
    Border,
    Gradient,
    Blur,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 11] = [
        TokenKind::Color,
        TokenKind::Measure,
        TokenKind::Font,
        TokenKind::Text,
        TokenKind::Generic,
        TokenKind::Typography,
        TokenKind::Radius,
        TokenKind::Shadow,
        TokenKind::Border,
        TokenKind::Gradient,
        TokenKind::Blur,
    ];

    /// Parses the persisted `type` tag.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        match name {
            "Color" => Some(TokenKind::Color),
            "Measure" => Some(TokenKind::Measure),
            "Font" => Some(TokenKind::Font),
            "Text" => Some(TokenKind::Text),
            "Generic" => Some(TokenKind::Generic),
            "Typography" => Some(TokenKind::Typography),
            "Radius" => Some(TokenKind::Radius),
            "Shadow" => Some(TokenKind::Shadow),
            "Border" => Some(TokenKind::Border),
            "Gradient" => Some(TokenKind::Gradient),
            "Blur" => Some(TokenKind::Blur),
            _ => None,
        }
    }

    /// Returns the persisted `type` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Color => "Color",
            TokenKind::Measure => "Measure",
            TokenKind::Font => "Font",
            TokenKind::Text => "Text",
            TokenKind::Generic => "Generic",
            TokenKind::Typography => "Typography",
            TokenKind::Radius => "Radius",
            TokenKind::Shadow => "Shadow",
            TokenKind::Border => "Border",
            TokenKind::Gradient => "Gradient",
            TokenKind::Blur => "Blur",
        }
    }

    /// Pure kinds carry only scalar sub-values and never embed other tokens.
    pub fn is_pure(self) -> bool {
        matches!(
            self,
            TokenKind::Color
                | TokenKind::Measure
                | TokenKind::Font
                | TokenKind::Text
                | TokenKind::Generic
        )
    }

    /// Compound kinds embed alias-capable sub-values.
    pub fn is_compound(self) -> bool {
        !self.is_pure()
    }

    /// Kinds whose tokens may form multi-layer stacks.
    pub fn is_layered(self) -> bool {
        matches!(
            self,
            TokenKind::Shadow | TokenKind::Gradient | TokenKind::Blur
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either a literal value or a link to another token.
#[derive(Debug, Clone, PartialEq)]
pub enum Aliasable<T> {
    Literal(T),
    Alias(TokenRef),
}

impl<T> Aliasable<T> {
    /// Returns the literal, if this is not an alias.
    pub fn literal(&self) -> Option<&T> {
        match self {
            Aliasable::Literal(v) => Some(v),
            Aliasable::Alias(_) => None,
        }
    }

    /// Returns the link, if this is an alias.
    pub fn reference(&self) -> Option<&TokenRef> {
        match self {
            Aliasable::Literal(_) => None,
            Aliasable::Alias(r) => Some(r),
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Aliasable::Alias(_))
    }
}

/// Measurement units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Pixels,
    Points,
    Percent,
    Ems,
    Rems,
    /// Unitless number.
    Raw,
}

impl Unit {
    pub fn from_name(name: &str) -> Option<Unit> {
        match name {
            "Pixels" => Some(Unit::Pixels),
            "Points" => Some(Unit::Points),
            "Percent" => Some(Unit::Percent),
            "Ems" => Some(Unit::Ems),
            "Rems" => Some(Unit::Rems),
            "Raw" => Some(Unit::Raw),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Pixels => "Pixels",
            Unit::Points => "Points",
            Unit::Percent => "Percent",
            Unit::Ems => "Ems",
            Unit::Rems => "Rems",
            Unit::Raw => "Raw",
        }
    }
}

/// Text case transformation of a typography token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Camel,
    SmallCaps,
}

impl TextCase {
    pub fn from_name(name: &str) -> Option<TextCase> {
        match name {
            "Original" => Some(TextCase::Original),
            "Upper" => Some(TextCase::Upper),
            "Lower" => Some(TextCase::Lower),
            "Camel" => Some(TextCase::Camel),
            "SmallCaps" => Some(TextCase::SmallCaps),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextCase::Original => "Original",
            TextCase::Upper => "Upper",
            TextCase::Lower => "Lower",
            TextCase::Camel => "Camel",
            TextCase::SmallCaps => "SmallCaps",
        }
    }
}

/// Text decoration of a typography token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

impl TextDecoration {
    pub fn from_name(name: &str) -> Option<TextDecoration> {
        match name {
            "None" => Some(TextDecoration::None),
            "Underline" => Some(TextDecoration::Underline),
            "Strikethrough" => Some(TextDecoration::Strikethrough),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextDecoration::None => "None",
            TextDecoration::Underline => "Underline",
            TextDecoration::Strikethrough => "Strikethrough",
        }
    }
}

/// Where a border is drawn relative to the shape edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderPosition {
    Inside,
    Center,
    Outside,
}

impl BorderPosition {
    pub fn from_name(name: &str) -> Option<BorderPosition> {
        match name {
            "Inside" => Some(BorderPosition::Inside),
            "Center" => Some(BorderPosition::Center),
            "Outside" => Some(BorderPosition::Outside),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BorderPosition::Inside => "Inside",
            BorderPosition::Center => "Center",
            BorderPosition::Outside => "Outside",
        }
    }
}

/// Drop (outer) or inner shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowType {
    Drop,
    Inner,
}

impl ShadowType {
    pub fn from_name(name: &str) -> Option<ShadowType> {
        match name {
            "Drop" => Some(ShadowType::Drop),
            "Inner" => Some(ShadowType::Inner),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShadowType::Drop => "Drop",
            ShadowType::Inner => "Inner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientType {
    Linear,
    Radial,
    Angular,
}

impl GradientType {
    pub fn from_name(name: &str) -> Option<GradientType> {
        match name {
            "Linear" => Some(GradientType::Linear),
            "Radial" => Some(GradientType::Radial),
            "Angular" => Some(GradientType::Angular),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GradientType::Linear => "Linear",
            GradientType::Radial => "Radial",
            GradientType::Angular => "Angular",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlurType {
    Layer,
    Background,
}

impl BlurType {
    pub fn from_name(name: &str) -> Option<BlurType> {
        match name {
            "Layer" => Some(BlurType::Layer),
            "Background" => Some(BlurType::Background),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlurType::Layer => "Layer",
            BlurType::Background => "Background",
        }
    }
}

/// An RGBA color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    /// Eight lowercase hex digits `rrggbbaa`, without `#`.
    pub hex: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Parses `rrggbb` or `rrggbbaa`, with or without a leading `#`.
    ///
    /// Six-digit input is treated as fully opaque.
    pub fn from_hex(input: &str) -> Option<Color> {
        let digits = input.trim().trim_start_matches('#');
        if digits.len() != 6 && digits.len() != 8 {
            return None;
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let r = channel(0)?;
        let g = channel(2)?;
        let b = channel(4)?;
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Some(Color::from_rgba(r, g, b, a))
    }

    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color {
            hex: format!("{:02x}{:02x}{:02x}{:02x}", r, g, b, a),
            r,
            g,
            b,
            a,
        }
    }
}

/// A magnitude with a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    pub measure: f64,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: String,
    pub subfamily: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Typography {
    pub font: Aliasable<Font>,
    pub font_size: Aliasable<Measure>,
    pub letter_spacing: Aliasable<Measure>,
    pub paragraph_indent: Aliasable<Measure>,
    pub paragraph_spacing: Aliasable<Measure>,
    /// `None` means the font's natural line height.
    pub line_height: Option<Aliasable<Measure>>,
    pub text_case: TextCase,
    pub text_decoration: TextDecoration,
}

/// Corner radius; per-corner values override the primary one when set.
#[derive(Debug, Clone, PartialEq)]
pub struct Radius {
    pub radius: Aliasable<Measure>,
    pub top_left: Option<Aliasable<Measure>>,
    pub top_right: Option<Aliasable<Measure>>,
    pub bottom_left: Option<Aliasable<Measure>>,
    pub bottom_right: Option<Aliasable<Measure>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub color: Aliasable<Color>,
    pub width: Aliasable<Measure>,
    pub position: BorderPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub color: Aliasable<Color>,
    pub x: Aliasable<Measure>,
    pub y: Aliasable<Measure>,
    pub spread: Aliasable<Measure>,
    pub radius: Aliasable<Measure>,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f64,
    pub shadow_type: ShadowType,
}

/// A point in normalized gradient space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub position: f64,
    pub color: Aliasable<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub from: Point,
    pub to: Point,
    pub gradient_type: GradientType,
    pub aspect_ratio: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blur {
    pub blur_type: BlurType,
    pub radius: Aliasable<Measure>,
}

/// The value of a token, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Color(Aliasable<Color>),
    Measure(Aliasable<Measure>),
    Font(Aliasable<Font>),
    Text(Aliasable<String>),
    Generic(Aliasable<String>),
    Typography(Aliasable<Typography>),
    Radius(Aliasable<Radius>),
    Shadow(Aliasable<Shadow>),
    Border(Aliasable<Border>),
    Gradient(Aliasable<Gradient>),
    Blur(Aliasable<Blur>),
}

impl TokenValue {
    /// Creates a top-level alias value of the given kind.
    pub fn alias(kind: TokenKind, target: TokenRef) -> TokenValue {
        match kind {
            TokenKind::Color => TokenValue::Color(Aliasable::Alias(target)),
            TokenKind::Measure => TokenValue::Measure(Aliasable::Alias(target)),
            TokenKind::Font => TokenValue::Font(Aliasable::Alias(target)),
            TokenKind::Text => TokenValue::Text(Aliasable::Alias(target)),
            TokenKind::Generic => TokenValue::Generic(Aliasable::Alias(target)),
            TokenKind::Typography => TokenValue::Typography(Aliasable::Alias(target)),
            TokenKind::Radius => TokenValue::Radius(Aliasable::Alias(target)),
            TokenKind::Shadow => TokenValue::Shadow(Aliasable::Alias(target)),
            TokenKind::Border => TokenValue::Border(Aliasable::Alias(target)),
            TokenKind::Gradient => TokenValue::Gradient(Aliasable::Alias(target)),
            TokenKind::Blur => TokenValue::Blur(Aliasable::Alias(target)),
        }
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenValue::Color(_) => TokenKind::Color,
            TokenValue::Measure(_) => TokenKind::Measure,
            TokenValue::Font(_) => TokenKind::Font,
            TokenValue::Text(_) => TokenKind::Text,
            TokenValue::Generic(_) => TokenKind::Generic,
            TokenValue::Typography(_) => TokenKind::Typography,
            TokenValue::Radius(_) => TokenKind::Radius,
            TokenValue::Shadow(_) => TokenKind::Shadow,
            TokenValue::Border(_) => TokenKind::Border,
            TokenValue::Gradient(_) => TokenKind::Gradient,
            TokenValue::Blur(_) => TokenKind::Blur,
        }
    }

    /// Returns the top-level link, if this value is an alias.
    pub fn referenced_token(&self) -> Option<&TokenRef> {
        match self {
            TokenValue::Color(v) => v.reference(),
            TokenValue::Measure(v) => v.reference(),
            TokenValue::Font(v) => v.reference(),
            TokenValue::Text(v) | TokenValue::Generic(v) => v.reference(),
            TokenValue::Typography(v) => v.reference(),
            TokenValue::Radius(v) => v.reference(),
            TokenValue::Shadow(v) => v.reference(),
            TokenValue::Border(v) => v.reference(),
            TokenValue::Gradient(v) => v.reference(),
            TokenValue::Blur(v) => v.reference(),
        }
    }

    pub fn is_alias(&self) -> bool {
        self.referenced_token().is_some()
    }

    /// Returns every link held by this value: the top-level alias or,
    /// for a literal compound value, each aliased sub-component.
    pub fn references(&self) -> Vec<&TokenRef> {
        if let Some(r) = self.referenced_token() {
            return vec![r];
        }
        let mut refs = Vec::new();
        match self {
            TokenValue::Typography(Aliasable::Literal(t)) => {
                refs.extend(t.font.reference());
                refs.extend(t.font_size.reference());
                refs.extend(t.letter_spacing.reference());
                refs.extend(t.paragraph_indent.reference());
                refs.extend(t.paragraph_spacing.reference());
                refs.extend(t.line_height.as_ref().and_then(Aliasable::reference));
            }
            TokenValue::Radius(Aliasable::Literal(r)) => {
                refs.extend(r.radius.reference());
                for corner in [&r.top_left, &r.top_right, &r.bottom_left, &r.bottom_right] {
                    refs.extend(corner.as_ref().and_then(Aliasable::reference));
                }
            }
            TokenValue::Border(Aliasable::Literal(b)) => {
                refs.extend(b.color.reference());
                refs.extend(b.width.reference());
            }
            TokenValue::Shadow(Aliasable::Literal(s)) => {
                refs.extend(s.color.reference());
                refs.extend(s.x.reference());
                refs.extend(s.y.reference());
                refs.extend(s.spread.reference());
                refs.extend(s.radius.reference());
            }
            TokenValue::Gradient(Aliasable::Literal(g)) => {
                refs.extend(g.stops.iter().filter_map(|s| s.color.reference()));
            }
            TokenValue::Blur(Aliasable::Literal(b)) => {
                refs.extend(b.radius.reference());
            }
            _ => {}
        }
        refs
    }
}
