//! Routes for inspection templates and their resolved form schemas.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    field_definition::FieldDefinition,
    inspection_template::{CreateInspectionTemplate, InspectionTemplate, UpdateInspectionTemplate},
};
use serde::Deserialize;
use services::services::{
    form_schema::{MergePolicy, ResolvedFormSchema},
    template_validation::find_duplicate_ids,
};
use tracing::info;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    pub property_id: Option<Uuid>,
    /// Overrides the configured merge policy for this request
    pub strict: Option<bool>,
}

fn ensure_unique_ids(fields: &[FieldDefinition]) -> Result<(), ApiError> {
    let issues = find_duplicate_ids(fields);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation("Template fields contain duplicate ids", issues))
    }
}

pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<InspectionTemplate>>>, ApiError> {
    let templates = InspectionTemplate::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(templates)))
}

pub async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<CreateInspectionTemplate>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<InspectionTemplate>>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("template name is empty".to_string()));
    }
    ensure_unique_ids(&payload.fields)?;

    let template = InspectionTemplate::create(&state.db().pool, Uuid::new_v4(), &payload).await?;
    info!(
        template_id = %template.id,
        fields = template.fields.len(),
        "Created inspection template"
    );
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(template)),
    ))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<InspectionTemplate>>, ApiError> {
    let template = InspectionTemplate::find_by_id(&state.db().pool, template_id)
        .await?
        .ok_or(ApiError::NotFound("template"))?;
    Ok(ResponseJson(ApiResponse::success(template)))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
    Json(payload): Json<UpdateInspectionTemplate>,
) -> Result<ResponseJson<ApiResponse<InspectionTemplate>>, ApiError> {
    if let Some(fields) = &payload.fields {
        ensure_unique_ids(fields)?;
    }
    let template = InspectionTemplate::update(&state.db().pool, template_id, &payload)
        .await?
        .ok_or(ApiError::NotFound("template"))?;
    info!(template_id = %template_id, "Updated inspection template");
    Ok(ResponseJson(ApiResponse::success(template)))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = InspectionTemplate::delete(&state.db().pool, template_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("template"));
    }
    info!(template_id = %template_id, "Deleted inspection template");
    Ok(ResponseJson(ApiResponse::success(())))
}

/// GET /api/templates/{template_id}/fields
/// Resolve the field list a cleaner sees, merged with the property's overrides
pub async fn get_template_fields(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
    Query(query): Query<FieldsQuery>,
) -> Result<ResponseJson<ApiResponse<ResolvedFormSchema>>, ApiError> {
    let service = match query.strict {
        Some(true) => state.form_schema().with_policy(MergePolicy::Strict),
        Some(false) => state.form_schema().with_policy(MergePolicy::Permissive),
        None => state.form_schema(),
    };
    let schema = service.resolve(template_id, query.property_id).await?;
    Ok(ResponseJson(ApiResponse::success(schema)))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/{template_id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/templates/{template_id}/fields", get(get_template_fields))
}
