// handlers/public/auth/refresh.rs - POST /refresh

use axum::{
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::cookie::session_cookies;
use crate::error::ApiError;
use crate::middleware::auth::cookie_value;
use crate::middleware::ApiResponse;
use crate::models::SessionUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub user: SessionUser,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// Refresh token from the body, else from the refresh cookie.
fn refresh_token(headers: &HeaderMap, body: Option<RefreshRequest>, cookie_name: &str) -> Option<String> {
    body.and_then(|b| b.refresh_token)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| cookie_value(headers, cookie_name))
}

/**
 * POST /refresh - Renew the session before the access token expires
 *
 * Input: optional `{ "refresh_token": "..." }`. Browser clients send nothing
 * and rely on the refresh cookie set at sign-in.
 *
 * Refresh tokens are single use. Both cookies are re-issued and the response
 * carries the replacement token bundle.
 */
pub async fn refresh_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> Result<Response, ApiError> {
    let security = &state.config.security;
    let token = refresh_token(&headers, body.map(|Json(b)| b), &security.refresh_cookie)
        .ok_or_else(|| ApiError::bad_request("Refresh token is required"))?;

    let session = state.backend.refresh(&token).await.map_err(|e| {
        tracing::warn!("Session refresh failed: {}", e);
        ApiError::from(e)
    })?;
    tracing::debug!("Session refreshed for user {}", session.user.id);

    let cookies = session_cookies(security, &session)?;
    let body = RefreshResponse {
        user: session.user,
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_in: session.expires_in,
    };

    Ok((AppendHeaders(cookies), ApiResponse::success(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    #[test]
    fn test_body_token_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-refresh-token=from-cookie"));

        let body = RefreshRequest { refresh_token: Some("from-body".to_string()) };
        assert_eq!(
            refresh_token(&headers, Some(body), "sb-refresh-token").as_deref(),
            Some("from-body")
        );
        assert_eq!(refresh_token(&headers, None, "sb-refresh-token").as_deref(), Some("from-cookie"));

        let blank = RefreshRequest { refresh_token: Some("  ".to_string()) };
        assert_eq!(
            refresh_token(&headers, Some(blank), "sb-refresh-token").as_deref(),
            Some("from-cookie")
        );
        assert_eq!(refresh_token(&HeaderMap::new(), None, "sb-refresh-token"), None);
    }
}
