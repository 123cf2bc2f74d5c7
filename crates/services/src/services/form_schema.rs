//! Resolves the form a cleaner fills in for a property from its stored template and overrides.

use db::models::{
    field_definition::FieldDefinition, inspection_template::InspectionTemplate,
    property_template_override::PropertyTemplateOverride,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::{debug, warn};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    template_merge::merge,
    template_validation::{MergeIssue, validate_overrides},
};

#[derive(Debug, Error)]
pub enum FormSchemaError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("template not found: {0}")]
    TemplateNotFound(Uuid),
    #[error("override document has {} issue(s)", .0.len())]
    InvalidOverrides(Vec<MergeIssue>),
}

/// How integrity issues found next to a merge are treated.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MergePolicy {
    /// Log and return the issues with the merged fields.
    #[default]
    Permissive,
    /// Reject the override document when any issue is found.
    Strict,
}

/// Final field list for one template, optionally customized for a property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct ResolvedFormSchema {
    pub template_id: Uuid,
    pub property_id: Option<Uuid>,
    pub template_name: String,
    pub fields: Vec<FieldDefinition>,
    pub has_overrides: bool,
    pub issues: Vec<MergeIssue>,
}

#[derive(Clone)]
pub struct FormSchemaService {
    pool: SqlitePool,
    policy: MergePolicy,
}

impl FormSchemaService {
    pub fn new(pool: SqlitePool, policy: MergePolicy) -> Self {
        Self { pool, policy }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Returns a service that applies `policy` instead of the configured one.
    pub fn with_policy(&self, policy: MergePolicy) -> Self {
        Self {
            pool: self.pool.clone(),
            policy,
        }
    }

    pub async fn resolve(
        &self,
        template_id: Uuid,
        property_id: Option<Uuid>,
    ) -> Result<ResolvedFormSchema, FormSchemaError> {
        let template = InspectionTemplate::find_by_id(&self.pool, template_id)
            .await?
            .ok_or(FormSchemaError::TemplateNotFound(template_id))?;

        let stored = match property_id {
            Some(property_id) => {
                PropertyTemplateOverride::find_for(&self.pool, property_id, template_id).await?
            }
            None => None,
        };
        let overrides = stored.as_ref().map(|s| &s.overrides);

        let issues = overrides
            .map(|o| validate_overrides(&template.fields, o))
            .unwrap_or_default();
        if !issues.is_empty() {
            match self.policy {
                MergePolicy::Strict => return Err(FormSchemaError::InvalidOverrides(issues)),
                MergePolicy::Permissive => {
                    for issue in &issues {
                        warn!(
                            template_id = %template_id,
                            property_id = ?property_id,
                            issue = %issue,
                            "Template override issue"
                        );
                    }
                }
            }
        }

        let fields = merge(&template.fields, overrides).into_owned();
        debug!(
            template_id = %template_id,
            property_id = ?property_id,
            base_fields = template.fields.len(),
            merged_fields = fields.len(),
            "Resolved form schema"
        );

        Ok(ResolvedFormSchema {
            template_id,
            property_id,
            template_name: template.name,
            fields,
            has_overrides: overrides.is_some(),
            issues,
        })
    }
}
