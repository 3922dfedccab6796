//! Custom property resolution.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as Json;
use tracing::warn;

use crate::codec::{RawPropertyDefinition, RawPropertyOverride};
use crate::error::ResolveError;
use crate::model::{CustomValue, Id, PropertyDefinition, PropertyType, PropertyValue};

/// Property definitions of one design system, indexed by id.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropertyCatalog {
    definitions: Vec<PropertyDefinition>,
    by_id: HashMap<Id, usize>,
}

impl PropertyCatalog {
    pub(crate) fn new(raw: &[RawPropertyDefinition]) -> Result<Self, ResolveError> {
        let mut catalog = PropertyCatalog::default();
        for def in raw {
            let id: Id = Arc::from(def.persistent_id.as_str());
            let property_type = PropertyType::from_name(&def.property_type).ok_or_else(|| {
                ResolveError::InvalidValue {
                    id: id.clone(),
                    field: "property type",
                    reason: format!("unknown property type {:?}", def.property_type),
                }
            })?;
            let default_value = match def.default_value.as_ref().filter(|v| !v.is_null()) {
                Some(v) => Some(convert(&id, property_type, v)?),
                None => None,
            };
            if catalog
                .by_id
                .insert(id.clone(), catalog.definitions.len())
                .is_some()
            {
                return Err(ResolveError::DuplicateId {
                    what: "property",
                    id,
                });
            }
            catalog.definitions.push(PropertyDefinition {
                id,
                name: def.name.clone(),
                code_name: def.code_name.clone(),
                property_type,
                default_value,
            });
        }
        Ok(catalog)
    }

    pub(crate) fn definitions(&self) -> &[PropertyDefinition] {
        &self.definitions
    }

    /// Resolves a token's property values: its own override, else the
    /// definition default, else nothing. Output follows definition order.
    pub(crate) fn values_for(
        &self,
        token: &Id,
        overrides: &[RawPropertyOverride],
    ) -> Result<Vec<PropertyValue>, ResolveError> {
        let mut own: Vec<Option<&Json>> = vec![None; self.definitions.len()];
        for o in overrides {
            match self.by_id.get(o.property_id.as_str()) {
                Some(&i) => {
                    if !o.value.is_null() {
                        own[i] = Some(&o.value);
                    }
                }
                None => warn!(token = %token, property = %o.property_id, "unknown custom property"),
            }
        }

        let mut values = Vec::new();
        for (def, own) in self.definitions.iter().zip(own) {
            let value = match own {
                Some(json) => Some(convert(token, def.property_type, json)?),
                None => def.default_value.clone(),
            };
            if let Some(value) = value {
                values.push(PropertyValue {
                    property_id: def.id.clone(),
                    code_name: def.code_name.clone(),
                    value,
                });
            }
        }
        Ok(values)
    }
}

fn convert(
    owner: &Id,
    property_type: PropertyType,
    json: &Json,
) -> Result<CustomValue, ResolveError> {
    let mismatch = || ResolveError::InvalidValue {
        id: owner.clone(),
        field: "custom property",
        reason: format!("expected {} value, got {json}", property_type.as_str()),
    };
    match property_type {
        PropertyType::Text | PropertyType::Generic | PropertyType::Select => json
            .as_str()
            .map(|s| CustomValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        PropertyType::Number => json.as_f64().map(CustomValue::Number).ok_or_else(mismatch),
        PropertyType::Boolean => json.as_bool().map(CustomValue::Boolean).ok_or_else(mismatch),
    }
}
