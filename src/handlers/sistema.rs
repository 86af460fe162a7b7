// src/handlers/sistema.rs

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::docs::ApiDoc;

// GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

// GET /api/docs/openapi.json
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
