//! Persisted record shapes.
//!
//! These mirror the JSON the design-system backend stores. Kind-dependent
//! payloads stay as [`serde_json::Value`] until the resolver knows the kind.

use serde::{Deserialize, Serialize};

/// Name and description shared by tokens, groups and themes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Provenance of a record imported from an external design tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrigin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

/// A value slot: an alias, a literal, or (invalidly) neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl RawTokenData {
    pub fn literal(value: serde_json::Value) -> Self {
        RawTokenData {
            alias_to: None,
            value: Some(value),
        }
    }

    pub fn alias(target: impl Into<String>) -> Self {
        RawTokenData {
            alias_to: Some(target.into()),
            value: None,
        }
    }

    /// The alias target, ignoring empty strings.
    pub fn alias_target(&self) -> Option<&str> {
        self.alias_to.as_deref().filter(|s| !s.is_empty())
    }

    /// The literal payload, ignoring JSON `null`.
    pub fn literal_value(&self) -> Option<&serde_json::Value> {
        self.value.as_ref().filter(|v| !v.is_null())
    }
}

/// A token's value for one custom property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPropertyOverride {
    pub property_id: String,
    pub value: serde_json::Value,
}

/// A persisted token record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToken {
    /// Versioned record id.
    pub id: String,
    pub brand_id: String,
    #[serde(default)]
    pub design_system_version_id: String,
    pub persistent_id: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub meta: RawMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_style: Option<RawOrigin>,
    #[serde(default)]
    pub data: RawTokenData,
    #[serde(default)]
    pub custom_property_overrides: Vec<RawPropertyOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A persisted group record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    pub persistent_id: String,
    pub brand_id: String,
    pub token_type: String,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default)]
    pub meta: RawMeta,
    #[serde(default)]
    pub children_ids: Vec<String>,
}

/// A persisted theme override record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawThemeOverride {
    pub token_persistent_id: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<RawOrigin>,
    #[serde(default)]
    pub data: RawTokenData,
}

/// A persisted theme with its ordered overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTheme {
    pub id: String,
    pub brand_id: String,
    #[serde(default)]
    pub meta: RawMeta,
    #[serde(default)]
    pub overrides: Vec<RawThemeOverride>,
}

/// A persisted custom property definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPropertyDefinition {
    pub persistent_id: String,
    pub name: String,
    pub code_name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

/// Everything a design-system version needs for one resolution call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDesignSystem {
    #[serde(default)]
    pub tokens: Vec<RawToken>,
    #[serde(default)]
    pub groups: Vec<RawGroup>,
    #[serde(default)]
    pub properties: Vec<RawPropertyDefinition>,
    #[serde(default)]
    pub themes: Vec<RawTheme>,
}

// =============================================================================
// KIND-SPECIFIC PAYLOADS
// =============================================================================

/// A nested alias-capable slot inside a compound payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSlot<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_to: Option<String>,
    // Missing `Option` fields deserialize as `None`; `default` here would
    // force a `T: Default` bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl<T> RawSlot<T> {
    pub fn literal(value: T) -> Self {
        RawSlot {
            alias_to: None,
            value: Some(value),
        }
    }

    pub fn alias(target: impl Into<String>) -> Self {
        RawSlot {
            alias_to: Some(target.into()),
            value: None,
        }
    }

    /// The alias target, ignoring an empty `aliasTo`.
    pub fn alias_target(&self) -> Option<&str> {
        self.alias_to.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether the slot carries neither an alias nor a value.
    pub fn is_unset(&self) -> bool {
        self.alias_target().is_none() && self.value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeasure {
    pub measure: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFont {
    pub family: String,
    #[serde(default)]
    pub subfamily: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypography {
    pub font: RawSlot<RawFont>,
    pub font_size: RawSlot<RawMeasure>,
    pub letter_spacing: RawSlot<RawMeasure>,
    pub paragraph_indent: RawSlot<RawMeasure>,
    pub paragraph_spacing: RawSlot<RawMeasure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<RawSlot<RawMeasure>>,
    #[serde(default = "default_text_case")]
    pub text_case: String,
    #[serde(default = "default_text_decoration")]
    pub text_decoration: String,
}

fn default_text_case() -> String {
    "Original".to_string()
}

fn default_text_decoration() -> String {
    "None".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRadius {
    pub radius: RawSlot<RawMeasure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_left: Option<RawSlot<RawMeasure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_right: Option<RawSlot<RawMeasure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<RawSlot<RawMeasure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<RawSlot<RawMeasure>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBorder {
    pub color: RawSlot<String>,
    pub width: RawSlot<RawMeasure>,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShadow {
    pub color: RawSlot<String>,
    pub x: RawSlot<RawMeasure>,
    pub y: RawSlot<RawMeasure>,
    pub radius: RawSlot<RawMeasure>,
    pub spread: RawSlot<RawMeasure>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(rename = "type", default = "default_shadow_type")]
    pub shadow_type: String,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_shadow_type() -> String {
    "Drop".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGradientStop {
    pub position: f64,
    pub color: RawSlot<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGradient {
    pub from: RawPoint,
    pub to: RawPoint,
    #[serde(rename = "type")]
    pub gradient_type: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub stops: Vec<RawGradientStop>,
}

fn default_aspect_ratio() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlur {
    #[serde(rename = "type")]
    pub blur_type: String,
    pub radius: RawSlot<RawMeasure>,
}
