use axum::{Router, response::Json as ResponseJson, routing::get};
use tower_http::trace::TraceLayer;
use utils::response::ApiResponse;

use crate::AppState;

pub mod property_overrides;
pub mod templates;

pub async fn health_check() -> ResponseJson<ApiResponse<String>> {
    ResponseJson(ApiResponse::success("OK".to_string()))
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .merge(templates::router(&state))
        .merge(property_overrides::router(&state));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
