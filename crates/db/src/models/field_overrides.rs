use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::field_definition::FieldDefinition;

/// Partial update to a base field. Unset attributes keep the base value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl FieldPatch {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.required.is_none()
    }
}

/// Per-property customization of a template's field list.
///
/// Every part may be missing from the stored document and then has no effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct FieldOverrides {
    #[serde(default)]
    pub removed_field_ids: Vec<String>,
    #[serde(default)]
    pub modified_fields: BTreeMap<String, FieldPatch>,
    #[serde(default)]
    pub additional_fields: Vec<FieldDefinition>,
}

impl FieldOverrides {
    pub fn is_empty(&self) -> bool {
        self.removed_field_ids.is_empty()
            && self.modified_fields.is_empty()
            && self.additional_fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_deserializes_to_defaults() {
        let overrides: FieldOverrides = serde_json::from_str("{}").unwrap();
        assert!(overrides.is_empty());
        assert_eq!(overrides, FieldOverrides::default());
    }

    #[test]
    fn test_partial_document() {
        let overrides: FieldOverrides = serde_json::from_str(
            r#"{"modified_fields":{"oven":{"required":true}},"removed_field_ids":["fridge"]}"#,
        )
        .unwrap();
        assert_eq!(overrides.removed_field_ids, vec!["fridge".to_string()]);
        let patch = &overrides.modified_fields["oven"];
        assert_eq!(patch.required, Some(true));
        assert!(patch.label.is_none());
        assert!(overrides.additional_fields.is_empty());
    }
}
