//! Routes for per-property template customizations.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    field_overrides::FieldOverrides, inspection_template::InspectionTemplate,
    property_template_override::PropertyTemplateOverride,
};
use services::services::{form_schema::MergePolicy, template_validation::validate_overrides};
use tracing::{info, warn};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn get_overrides(
    State(state): State<AppState>,
    Path((property_id, template_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<PropertyTemplateOverride>>, ApiError> {
    let stored = PropertyTemplateOverride::find_for(&state.db().pool, property_id, template_id)
        .await?
        .ok_or(ApiError::NotFound("template override"))?;
    Ok(ResponseJson(ApiResponse::success(stored)))
}

/// PUT /api/properties/{property_id}/templates/{template_id}/overrides
/// Store the override document, replacing any previous one for the pair
pub async fn put_overrides(
    State(state): State<AppState>,
    Path((property_id, template_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<FieldOverrides>,
) -> Result<ResponseJson<ApiResponse<PropertyTemplateOverride>>, ApiError> {
    let pool = &state.db().pool;
    let template = InspectionTemplate::find_by_id(pool, template_id)
        .await?
        .ok_or(ApiError::NotFound("template"))?;

    let issues = validate_overrides(&template.fields, &payload);
    if !issues.is_empty() {
        if state.config().merge_policy == MergePolicy::Strict {
            return Err(ApiError::validation(
                "Template overrides failed validation",
                issues,
            ));
        }
        warn!(
            property_id = %property_id,
            template_id = %template_id,
            issues = issues.len(),
            "Storing template overrides with integrity issues"
        );
    }

    let stored =
        PropertyTemplateOverride::upsert(pool, Uuid::new_v4(), property_id, template_id, &payload)
            .await?;
    info!(
        property_id = %property_id,
        template_id = %template_id,
        removed = payload.removed_field_ids.len(),
        modified = payload.modified_fields.len(),
        added = payload.additional_fields.len(),
        "Saved template overrides"
    );
    Ok(ResponseJson(ApiResponse::success(stored)))
}

/// GET /api/templates/{template_id}/overrides
/// List every property customization of a template
pub async fn list_template_overrides(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<PropertyTemplateOverride>>>, ApiError> {
    let overrides =
        PropertyTemplateOverride::find_by_template_id(&state.db().pool, template_id).await?;
    Ok(ResponseJson(ApiResponse::success(overrides)))
}

pub async fn delete_overrides(
    State(state): State<AppState>,
    Path((property_id, template_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected =
        PropertyTemplateOverride::delete_for(&state.db().pool, property_id, template_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("template override"));
    }
    info!(
        property_id = %property_id,
        template_id = %template_id,
        "Deleted template overrides"
    );
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/properties/{property_id}/templates/{template_id}/overrides",
            get(get_overrides).put(put_overrides).delete(delete_overrides),
        )
        .route(
            "/templates/{template_id}/overrides",
            get(list_template_overrides),
        )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use db::{
        DBService,
        models::inspection_template::CreateInspectionTemplate,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::ServerConfig, routes};

    async fn state_with(policy: MergePolicy) -> (AppState, Uuid) {
        let db = DBService::new_in_memory().await.unwrap();
        let template_id = Uuid::new_v4();
        InspectionTemplate::create(
            &db.pool,
            template_id,
            &CreateInspectionTemplate {
                name: "Turnover".to_string(),
                description: None,
                fields: serde_json::from_value(json!([
                    {"id": "beds", "type": "checkbox", "label": "Beds"}
                ]))
                .unwrap(),
            },
        )
        .await
        .unwrap();
        let config = ServerConfig {
            merge_policy: policy,
            ..Default::default()
        };
        (AppState::new(db, config), template_id)
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = routes::router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_put_get_delete_round() {
        let (state, template_id) = state_with(MergePolicy::Permissive).await;
        let property_id = Uuid::new_v4();
        let uri = format!("/api/properties/{property_id}/templates/{template_id}/overrides");

        let (status, _) = send(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &state,
            Method::PUT,
            &uri,
            Some(json!({"modified_fields": {"beds": {"label": "Beds made"}}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["overrides"]["modified_fields"]["beds"]["label"],
            "Beds made"
        );

        let (status, body) = send(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["overrides"]["removed_field_ids"], json!([]));

        let (status, body) = send(
            &state,
            Method::GET,
            &format!("/api/templates/{template_id}/overrides"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

        let (status, _) = send(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_dangling_override() {
        let (state, template_id) = state_with(MergePolicy::Strict).await;
        let uri = format!(
            "/api/properties/{}/templates/{template_id}/overrides",
            Uuid::new_v4()
        );
        let (status, body) = send(
            &state,
            Method::PUT,
            &uri,
            Some(json!({"removed_field_ids": ["sauna"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_data"][0]["kind"], "dangling_removal");
    }

    #[tokio::test]
    async fn test_put_for_unknown_template() {
        let (state, _) = state_with(MergePolicy::Permissive).await;
        let uri = format!(
            "/api/properties/{}/templates/{}/overrides",
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let (status, _) = send(&state, Method::PUT, &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
