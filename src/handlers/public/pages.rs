// handlers/public/pages.rs - Service info, health and error pages

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET / - Service information
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Certily API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Airport shop audit tracking",
        "endpoints": {
            "public": ["/", "/health", "/login", "/signup", "/logout"],
            "dashboard": "/dashboard[/assessments|/shops|/analytics|/super-admin]",
            "audit": "/audit[/:shop_id] (airport_manager, super_user)",
            "litige": "/litige (airport staff, super_user)",
            "result": "/result/:id",
            "account": ["/profile", "/settings"],
        }
    }))
}

/// GET /health - Backend reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.backend.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "backend": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Backend health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "backend unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "backend_error": e.to_string()
                    }
                })),
            )
        }
    }
}

/// GET /unauthorized - Target of role-gate denials
pub async fn unauthorized() -> ApiError {
    ApiError::forbidden("You don't have permission to access this page")
}

/// GET /not-found and every unmatched path
pub async fn not_found() -> ApiError {
    ApiError::not_found("The page you are looking for does not exist")
}
