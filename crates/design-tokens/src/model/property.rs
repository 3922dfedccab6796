//! Custom token properties.
//!
//! A design system may declare extra typed properties that every token can
//! carry (for example a "deprecated" flag or a platform code name).

use crate::model::Id;

/// Type of a custom property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Text,
    Number,
    Boolean,
    /// Free-form text without editor hints.
    Generic,
    /// One of a fixed set of option ids, stored as text.
    Select,
}

impl PropertyType {
    pub fn from_name(name: &str) -> Option<PropertyType> {
        match name {
            "Text" => Some(PropertyType::Text),
            "Number" => Some(PropertyType::Number),
            "Boolean" => Some(PropertyType::Boolean),
            "Generic" => Some(PropertyType::Generic),
            "Select" => Some(PropertyType::Select),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Text => "Text",
            PropertyType::Number => "Number",
            PropertyType::Boolean => "Boolean",
            PropertyType::Generic => "Generic",
            PropertyType::Select => "Select",
        }
    }
}

/// A typed custom property value.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomValue {
    Text(String),
    Number(f64),
    Boolean(bool),
}

/// A custom property definition.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub id: Id,
    pub name: String,
    /// Identifier-safe name used by exporters.
    pub code_name: String,
    pub property_type: PropertyType,
    pub default_value: Option<CustomValue>,
}

/// The value of one custom property on one token.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub property_id: Id,
    pub code_name: String,
    pub value: CustomValue,
}
