// handlers/public/auth/signup.rs - GET/POST /signup

use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::cookie::session_cookies;
use crate::error::ApiError;
use crate::middleware::route_access::{DASHBOARD_PATH, LOGIN_PATH};
use crate::middleware::ApiResponse;
use crate::models::{Credentials, SessionUser};
use crate::state::AppState;

/// Minimum password length accepted by the hosted auth service.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: SessionUser,
    /// No session yet: the account must be confirmed by email first.
    pub confirmation_required: bool,
    pub redirect_to: &'static str,
}

/// GET /signup - Form descriptor
pub async fn signup_get() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "signup",
        "fields": ["email", "password"],
        "submit": "/signup",
        "login": "/login",
        "min_password_length": MIN_PASSWORD_LEN,
    }))
}

/// POST /signup - Account creation
///
/// New accounts have no profile yet, so they cannot reach role-gated pages
/// until an administrator assigns a role.
pub async fn signup_post(State(state): State<AppState>, Json(credentials): Json<Credentials>) -> Result<Response, ApiError> {
    credentials.validate().map_err(ApiError::bad_request)?;
    if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::field_error(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }

    let outcome = state.backend.sign_up(&credentials).await.map_err(|e| {
        tracing::warn!("Sign-up failed for {}: {}", credentials.email, e);
        ApiError::from(e)
    })?;
    tracing::info!("Account {} created", outcome.user.id);

    let body = SignupResponse {
        user: outcome.user,
        confirmation_required: outcome.session.is_none(),
        redirect_to: if outcome.session.is_some() { DASHBOARD_PATH } else { LOGIN_PATH },
    };

    match outcome.session {
        Some(session) => {
            let cookies = session_cookies(&state.config.security, &session)?;
            Ok((AppendHeaders(cookies), ApiResponse::created(body)).into_response())
        }
        None => Ok(ApiResponse::created(body).into_response()),
    }
}
