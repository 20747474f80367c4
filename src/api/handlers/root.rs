use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

use crate::error::AppError;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Kudos API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Achievement notifications for community members",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "achievements": "/api/achievements",
            "current": "/api/achievements/current",
            "toast": "/portal/achievements/toast"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}
