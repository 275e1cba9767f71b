// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Liveness check with a map of the public endpoints.
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "endpoints": {
            "admin": {
                "login": "POST /api/admin/login",
                "config": "GET/POST /api/admin/config",
                "questions": "GET/POST /api/admin/questions, DELETE /api/admin/questions/{id}",
                "results": "GET/DELETE /api/admin/results, DELETE /api/admin/results/{id}",
                "dashboard": "GET /api/admin/dashboard, GET /api/admin/dashboard-full",
                "categories": "GET /api/admin/category-stats, POST /api/admin/update-category-status"
            },
            "user": {
                "categories": "GET /api/user/categories",
                "register": "POST /api/user/register",
                "questions": "GET /api/user/questions/{category}",
                "submit": "POST /api/user/submit"
            }
        }
    }))
}

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Quiz System API",
        "status": "Running",
        "health": "/api/health"
    }))
}
