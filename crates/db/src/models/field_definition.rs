use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use super::field_overrides::FieldPatch;

/// Kind of checklist item rendered for a cleaner.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldType {
    Rating,
    YesNo,
    Text,
    Checkbox,
    /// Single photo upload
    Photo,
    /// Multiple photo upload, bounded by `FieldOptions::max_photos`
    Photos,
    /// Visual separator, carries no answer
    Separator,
}

impl FieldType {
    /// Whether the kind collects photo uploads.
    pub fn accepts_photos(&self) -> bool {
        matches!(self, FieldType::Photo | FieldType::Photos)
    }
}

/// Kind-specific configuration. Only photo kinds use it today.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct FieldOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_photos: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_mb: Option<u32>,
}

/// A single item of an inspection checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct FieldDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            required: false,
            options: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Returns a copy with the patched attributes replaced.
    ///
    /// Only `label` and `required` are patchable; `id`, `field_type` and
    /// `options` always come from `self`.
    pub fn with_patch(&self, patch: &FieldPatch) -> Self {
        Self {
            id: self.id.clone(),
            field_type: self.field_type,
            label: patch.label.clone().unwrap_or_else(|| self.label.clone()),
            required: patch.required.unwrap_or(self.required),
            options: self.options.clone(),
        }
    }
}
