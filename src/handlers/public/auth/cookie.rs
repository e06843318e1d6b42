// handlers/public/auth/cookie.rs - Session cookie headers

use axum::http::{header::SET_COOKIE, HeaderName, HeaderValue};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::models::AuthSession;

/// Cookie lifetime when the auth service does not report one.
const DEFAULT_MAX_AGE_SECS: i64 = 3600;

/// The auth service decides when a refresh token stops working; the cookie
/// only has to outlive the access token.
const REFRESH_MAX_AGE_SECS: i64 = 30 * 24 * 3600;

/// The refresh token is only ever sent to the refresh endpoint.
pub const REFRESH_PATH: &str = "/refresh";

pub type CookieHeaders = Vec<(HeaderName, HeaderValue)>;

fn build(security: &SecurityConfig, name: &str, value: &str, path: &str, max_age: i64) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; Path={}; HttpOnly; SameSite=Lax; Max-Age={}",
        name, value, path, max_age
    );
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie).map_err(|e| {
        tracing::error!("Cannot encode {} cookie: {}", name, e);
        ApiError::internal_server_error("Failed to create session cookie")
    })
}

pub fn session_cookie(security: &SecurityConfig, token: &str, expires_in: Option<i64>) -> Result<HeaderValue, ApiError> {
    let max_age = expires_in.unwrap_or(DEFAULT_MAX_AGE_SECS).max(0);
    build(security, &security.session_cookie, token, "/", max_age)
}

pub fn refresh_cookie(security: &SecurityConfig, refresh_token: &str) -> Result<HeaderValue, ApiError> {
    build(security, &security.refresh_cookie, refresh_token, REFRESH_PATH, REFRESH_MAX_AGE_SECS)
}

/// `Set-Cookie` headers for a fresh session. The access cookie comes first.
pub fn session_cookies(security: &SecurityConfig, session: &AuthSession) -> Result<CookieHeaders, ApiError> {
    let mut headers = vec![(
        SET_COOKIE,
        session_cookie(security, &session.access_token, session.expires_in)?,
    )];
    if let Some(refresh_token) = &session.refresh_token {
        headers.push((SET_COOKIE, refresh_cookie(security, refresh_token)?));
    }
    Ok(headers)
}

pub fn cleared_cookies(security: &SecurityConfig) -> Result<CookieHeaders, ApiError> {
    Ok(vec![
        (SET_COOKIE, build(security, &security.session_cookie, "", "/", 0)?),
        (SET_COOKIE, build(security, &security.refresh_cookie, "", REFRESH_PATH, 0)?),
    ])
}
