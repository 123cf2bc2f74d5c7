//! Opt-in integrity checks for template data.
//!
//! Kept apart from [`super::template_merge::merge`], which never rejects input.
//! Callers decide whether an issue is a warning or an error.

use std::collections::HashSet;

use db::models::{field_definition::FieldDefinition, field_overrides::FieldOverrides};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use super::template_merge::merge;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeIssue {
    #[error("field id '{id}' appears more than once")]
    DuplicateId { id: String },
    #[error("removed field id '{id}' is not in the template")]
    DanglingRemoval { id: String },
    #[error("modified field id '{id}' is not among the remaining template fields")]
    DanglingPatch { id: String },
}

/// Reports every id that occurs more than once, in order of its first repeat.
pub fn find_duplicate_ids(fields: &[FieldDefinition]) -> Vec<MergeIssue> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut issues = Vec::new();
    for field in fields {
        if !seen.insert(field.id.as_str()) && reported.insert(field.id.as_str()) {
            issues.push(MergeIssue::DuplicateId {
                id: field.id.clone(),
            });
        }
    }
    issues
}

/// Checks an override document against the base list it will be merged with.
pub fn validate_overrides(
    base_fields: &[FieldDefinition],
    overrides: &FieldOverrides,
) -> Vec<MergeIssue> {
    let base_ids: HashSet<&str> = base_fields.iter().map(|f| f.id.as_str()).collect();
    let removed: HashSet<&str> = overrides
        .removed_field_ids
        .iter()
        .map(String::as_str)
        .collect();

    let mut issues: Vec<MergeIssue> = overrides
        .removed_field_ids
        .iter()
        .filter(|id| !base_ids.contains(id.as_str()))
        .map(|id| MergeIssue::DanglingRemoval { id: id.clone() })
        .collect();

    issues.extend(
        overrides
            .modified_fields
            .keys()
            .filter(|id| !base_ids.contains(id.as_str()) || removed.contains(id.as_str()))
            .map(|id| MergeIssue::DanglingPatch { id: id.clone() }),
    );

    issues.extend(find_duplicate_ids(&merge(base_fields, Some(overrides))));
    issues
}
