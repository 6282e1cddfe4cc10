use axum::Json;

use crate::app::dto::HealthResponse;
use crate::app::errors::ApiError;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { success: true })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
