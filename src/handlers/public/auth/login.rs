// handlers/public/auth/login.rs - GET/POST /login

use axum::{
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::cookie::session_cookies;
use crate::error::ApiError;
use crate::middleware::route_access::DASHBOARD_PATH;
use crate::middleware::ApiResponse;
use crate::models::{Credentials, SessionUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "redirectedFrom")]
    pub redirected_from: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub redirect_to: String,
}

/// Only same-site absolute paths are followed after sign-in.
pub fn redirect_after_login(redirected_from: Option<&str>) -> String {
    match redirected_from {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path.to_string(),
        _ => DASHBOARD_PATH.to_string(),
    }
}

/// GET /login - Form descriptor
pub async fn login_get(Query(query): Query<LoginQuery>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "login",
        "fields": ["email", "password"],
        "submit": "/login",
        "signup": "/signup",
        "redirected_from": query.redirected_from,
    }))
}

/**
 * POST /login - Password sign-in
 *
 * Input: `{ "email": "...", "password": "..." }`, optional `?redirectedFrom=`
 * carried over from the login redirect.
 *
 * Sets the session and refresh cookies and returns the token bundle plus
 * where the client should go next.
 */
pub async fn login_post(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, ApiError> {
    credentials.validate().map_err(ApiError::bad_request)?;

    let session = state.backend.sign_in(&credentials).await.map_err(|e| {
        tracing::warn!("Sign-in failed for {}: {}", credentials.email, e);
        ApiError::from(e)
    })?;
    tracing::info!("User {} signed in", session.user.id);

    let cookies = session_cookies(&state.config.security, &session)?;
    let body = LoginResponse {
        user: session.user,
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_in: session.expires_in,
        redirect_to: redirect_after_login(query.redirected_from.as_deref()),
    };

    Ok((AppendHeaders(cookies), ApiResponse::success(body)).into_response())
}
