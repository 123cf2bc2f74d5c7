use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{form_schema::FormSchemaError, template_validation::MergeIssue};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    FormSchema(#[from] FormSchemaError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<MergeIssue>,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>, issues: Vec<MergeIssue>) -> Self {
        Self::Validation {
            message: message.into(),
            issues,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, issues) = match self {
            ApiError::Database(e) => {
                error!(error = %e, "Database error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    None,
                )
            }
            ApiError::FormSchema(FormSchemaError::Database(e)) => {
                error!(error = %e, "Database error while resolving form schema");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    None,
                )
            }
            ApiError::FormSchema(e @ FormSchemaError::TemplateNotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string(), None)
            }
            ApiError::FormSchema(FormSchemaError::InvalidOverrides(issues)) => (
                StatusCode::BAD_REQUEST,
                "Template overrides failed validation".to_string(),
                Some(issues),
            ),
            e @ ApiError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string(), None),
            ApiError::Validation { message, issues } => {
                (StatusCode::BAD_REQUEST, message, Some(issues))
            }
            e @ ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, e.to_string(), None),
        };

        let body: ApiResponse<(), Vec<MergeIssue>> = match issues {
            Some(issues) => ApiResponse::error_with_data(&message, issues),
            None => ApiResponse::error(&message),
        };
        (status, Json(body)).into_response()
    }
}
