//! Data model types for design tokens.
//!
//! This module contains the shapes everything else works on:
//! - Identifiers and arena handles
//! - Values (typed, alias-capable token payloads)
//! - Tokens and groups
//! - Custom properties

pub mod group;
pub mod id;
pub mod property;
pub mod token;
pub mod value;

pub use group::{Group, GroupForest};
pub use id::{GroupIdx, Id, ORIGIN_SEGMENT_SEPARATOR, RefScope, TokenIdx, TokenRef, origin_key};
pub use property::{CustomValue, PropertyDefinition, PropertyType, PropertyValue};
pub use token::{Origin, Token};
pub use value::{
    Aliasable, BlurType, Blur, Border, BorderPosition, Color, Font, Gradient, GradientStop,
    GradientType, Measure, Point, Radius, Shadow, ShadowType, TextCase, TextDecoration, TokenKind,
    TokenValue, Typography, Unit,
};
