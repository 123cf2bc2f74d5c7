//! Combines a template's base field list with a property's override document.
//!
//! The merge is a total function: unknown ids in removals or patches and
//! duplicate ids introduced by additional fields are carried through silently.
//! See [`super::template_validation`] for the opt-in checks.

use std::{borrow::Cow, collections::HashSet};

use db::models::{field_definition::FieldDefinition, field_overrides::FieldOverrides};

/// Produces the final ordered field list for one property.
///
/// Surviving base fields keep their relative order, patched in place, and
/// `additional_fields` follow in the order given. Without overrides the base
/// slice is returned borrowed.
pub fn merge<'a>(
    base_fields: &'a [FieldDefinition],
    overrides: Option<&FieldOverrides>,
) -> Cow<'a, [FieldDefinition]> {
    let Some(overrides) = overrides else {
        return Cow::Borrowed(base_fields);
    };

    let removed: HashSet<&str> = overrides
        .removed_field_ids
        .iter()
        .map(String::as_str)
        .collect();

    let mut merged = Vec::with_capacity(base_fields.len() + overrides.additional_fields.len());
    for field in base_fields {
        if removed.contains(field.id.as_str()) {
            continue;
        }
        match overrides.modified_fields.get(&field.id) {
            Some(patch) => merged.push(field.with_patch(patch)),
            None => merged.push(field.clone()),
        }
    }
    merged.extend(overrides.additional_fields.iter().cloned());

    Cow::Owned(merged)
}
