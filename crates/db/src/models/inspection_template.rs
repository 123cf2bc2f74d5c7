use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

use super::field_definition::FieldDefinition;

/// Stored inspection template: the base field list every property starts from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct InspectionTemplate {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct InspectionTemplateRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    fields: Json<Vec<FieldDefinition>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InspectionTemplateRow> for InspectionTemplate {
    fn from(row: InspectionTemplateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            fields: row.fields.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateInspectionTemplate {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateInspectionTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<FieldDefinition>>,
}

const TEMPLATE_COLUMNS: &str = "id, name, description, fields, created_at, updated_at";

impl InspectionTemplate {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateInspectionTemplate,
    ) -> Result<Self, sqlx::Error> {
        let row: InspectionTemplateRow = sqlx::query_as(&format!(
            r#"INSERT INTO inspection_templates (id, name, description, fields)
               VALUES ($1, $2, $3, $4)
               RETURNING {TEMPLATE_COLUMNS}"#
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(Json(&data.fields))
        .fetch_one(pool)
        .await?;
        Ok(row.into())
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let row: Option<InspectionTemplateRow> = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM inspection_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Into::into))
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let rows: Vec<InspectionTemplateRow> = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM inspection_templates ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Applies the set attributes of `data`; returns `None` if the template does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateInspectionTemplate,
    ) -> Result<Option<Self>, sqlx::Error> {
        let row: Option<InspectionTemplateRow> = sqlx::query_as(&format!(
            r#"UPDATE inspection_templates
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   fields = COALESCE($4, fields),
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {TEMPLATE_COLUMNS}"#
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.fields.as_ref().map(Json))
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Into::into))
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inspection_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DBService, models::field_definition::FieldType};

    fn sample_fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("entry", FieldType::Rating, "Entry cleanliness").required(true),
            FieldDefinition::new("divider", FieldType::Separator, "Kitchen"),
            FieldDefinition::new("oven", FieldType::YesNo, "Oven cleaned"),
        ]
    }

    #[tokio::test]
    async fn test_create_and_find_preserves_field_order() {
        let db = DBService::new_in_memory().await.unwrap();
        let id = Uuid::new_v4();
        let created = InspectionTemplate::create(
            &db.pool,
            id,
            &CreateInspectionTemplate {
                name: "Standard turnover".to_string(),
                description: None,
                fields: sample_fields(),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.id, id);

        let found = InspectionTemplate::find_by_id(&db.pool, id)
            .await
            .unwrap()
            .expect("template exists");
        let ids: Vec<&str> = found.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["entry", "divider", "oven"]);
        assert_eq!(found.fields, sample_fields());
    }

    #[tokio::test]
    async fn test_update_keeps_unset_attributes() {
        let db = DBService::new_in_memory().await.unwrap();
        let id = Uuid::new_v4();
        InspectionTemplate::create(
            &db.pool,
            id,
            &CreateInspectionTemplate {
                name: "Deep clean".to_string(),
                description: Some("Quarterly".to_string()),
                fields: sample_fields(),
            },
        )
        .await
        .unwrap();

        let updated = InspectionTemplate::update(
            &db.pool,
            id,
            &UpdateInspectionTemplate {
                name: Some("Deep clean v2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("template exists");
        assert_eq!(updated.name, "Deep clean v2");
        assert_eq!(updated.description.as_deref(), Some("Quarterly"));
        assert_eq!(updated.fields.len(), 3);

        let missing = InspectionTemplate::update(
            &db.pool,
            Uuid::new_v4(),
            &UpdateInspectionTemplate::default(),
        )
        .await
        .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_all_and_delete() {
        let db = DBService::new_in_memory().await.unwrap();
        for name in ["A", "B"] {
            InspectionTemplate::create(
                &db.pool,
                Uuid::new_v4(),
                &CreateInspectionTemplate {
                    name: name.to_string(),
                    description: None,
                    fields: vec![],
                },
            )
            .await
            .unwrap();
        }
        let all = InspectionTemplate::find_all(&db.pool).await.unwrap();
        assert_eq!(all.len(), 2);

        assert_eq!(InspectionTemplate::delete(&db.pool, all[0].id).await.unwrap(), 1);
        assert_eq!(InspectionTemplate::delete(&db.pool, all[0].id).await.unwrap(), 0);
        assert_eq!(InspectionTemplate::find_all(&db.pool).await.unwrap().len(), 1);
    }
}
