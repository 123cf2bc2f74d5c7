use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

use super::field_overrides::FieldOverrides;

/// Override document stored for a (property, template) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct PropertyTemplateOverride {
    pub id: Uuid,
    pub property_id: Uuid,
    pub template_id: Uuid, // Foreign key to InspectionTemplate
    pub overrides: FieldOverrides,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct PropertyTemplateOverrideRow {
    id: Uuid,
    property_id: Uuid,
    template_id: Uuid,
    overrides: Json<FieldOverrides>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PropertyTemplateOverrideRow> for PropertyTemplateOverride {
    fn from(row: PropertyTemplateOverrideRow) -> Self {
        Self {
            id: row.id,
            property_id: row.property_id,
            template_id: row.template_id,
            overrides: row.overrides.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const OVERRIDE_COLUMNS: &str = "id, property_id, template_id, overrides, created_at, updated_at";

impl PropertyTemplateOverride {
    /// Inserts the document, or replaces the existing one for the same pair.
    ///
    /// `id` is only used when a new row is inserted.
    pub async fn upsert(
        pool: &SqlitePool,
        id: Uuid,
        property_id: Uuid,
        template_id: Uuid,
        overrides: &FieldOverrides,
    ) -> Result<Self, sqlx::Error> {
        let row: PropertyTemplateOverrideRow = sqlx::query_as(&format!(
            r#"INSERT INTO property_template_overrides (id, property_id, template_id, overrides)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (property_id, template_id) DO UPDATE
               SET overrides = excluded.overrides,
                   updated_at = datetime('now', 'subsec')
               RETURNING {OVERRIDE_COLUMNS}"#
        ))
        .bind(id)
        .bind(property_id)
        .bind(template_id)
        .bind(Json(overrides))
        .fetch_one(pool)
        .await?;
        Ok(row.into())
    }

    pub async fn find_for(
        pool: &SqlitePool,
        property_id: Uuid,
        template_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let row: Option<PropertyTemplateOverrideRow> = sqlx::query_as(&format!(
            r#"SELECT {OVERRIDE_COLUMNS}
               FROM property_template_overrides
               WHERE property_id = $1 AND template_id = $2"#
        ))
        .bind(property_id)
        .bind(template_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Into::into))
    }

    pub async fn find_by_template_id(
        pool: &SqlitePool,
        template_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows: Vec<PropertyTemplateOverrideRow> = sqlx::query_as(&format!(
            r#"SELECT {OVERRIDE_COLUMNS}
               FROM property_template_overrides
               WHERE template_id = $1
               ORDER BY created_at ASC, rowid ASC"#
        ))
        .bind(template_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn delete_for(
        pool: &SqlitePool,
        property_id: Uuid,
        template_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM property_template_overrides WHERE property_id = $1 AND template_id = $2",
        )
        .bind(property_id)
        .bind(template_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
