use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::info;

use crate::infrastructure::axum_http::error_responses::ErrorResponse;

pub async fn not_found() -> impl IntoResponse {
    info!("router: not_found handler invoked");
    ErrorResponse::new(StatusCode::NOT_FOUND, "NOT_FOUND".to_string())
}

pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "pong" })))
}
