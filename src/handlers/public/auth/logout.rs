// handlers/public/auth/logout.rs - POST /logout

use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
    Extension,
};
use serde_json::json;

use super::cookie::cleared_cookies;
use crate::error::ApiError;
use crate::middleware::route_access::LOGIN_PATH;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// POST /logout - Revoke the session and clear the cookies
///
/// Always succeeds for the client; a failed revocation is only logged.
pub async fn logout_post(
    State(state): State<AppState>,
    session: Option<Extension<AuthUser>>,
) -> Result<Response, ApiError> {
    if let Some(Extension(user)) = session {
        match state.backend.sign_out(&user.token).await {
            Ok(()) => tracing::info!("User {} signed out", user.id),
            Err(e) => tracing::error!("Error signing out user {}: {}", user.id, e),
        }
    }

    let cookies = cleared_cookies(&state.config.security)?;
    let body = json!({ "signed_out": true, "redirect_to": LOGIN_PATH });

    Ok((AppendHeaders(cookies), ApiResponse::success(body)).into_response())
}
