use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use super::route_access::LOGIN_PATH;
use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::models::UserContext;
use crate::services::context::user_context;
use crate::state::AppState;

/// Authenticated session extracted from the access token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub token: String,
}

/// Resolve the session from the request headers.
///
/// The token must carry a valid signature and the auth service must still
/// know the session, so signed-out tokens are rejected before they expire. A
/// missing, invalid or revoked token yields `None`, as does an unreachable
/// auth service.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Option<AuthUser> {
    let security = &state.config.security;
    let token = extract_token(headers, &security.session_cookie)?;

    let claims = match validate_jwt(&token, security) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Ignoring session token: {}", e);
            return None;
        }
    };

    match state.backend.user(&token).await {
        Ok(user) if user.id == claims.sub => Some(AuthUser {
            id: user.id,
            email: user.email.or(claims.email),
            token,
        }),
        Ok(user) => {
            tracing::warn!("Session token for {} resolved to user {}", claims.sub, user.id);
            None
        }
        Err(e) if e.is_unauthorized() => {
            tracing::debug!("Session of {} is no longer valid: {}", claims.sub, e);
            None
        }
        Err(e) => {
            tracing::error!("Cannot verify session of {}: {}", claims.sub, e);
            None
        }
    }
}

/// Bearer token first, then the session cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(auth) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    cookie_value(headers, cookie_name)
}

/// Non-empty value of the named request cookie.
pub fn cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Signed-in user with a resolved profile.
///
/// Rejects with a redirect to the login page when there is no session or the
/// session has no usable profile.
#[derive(Clone, Debug)]
pub struct Viewer {
    pub session: AuthUser,
    pub context: UserContext,
}

impl Viewer {
    pub fn token(&self) -> &str {
        &self.session.token
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| Redirect::temporary(LOGIN_PATH).into_response())?;

        if let Some(context) = parts.extensions.get::<UserContext>().cloned() {
            return Ok(Viewer { session, context });
        }

        let context = user_context(state.backend.as_ref(), &session)
            .await
            .map_err(|e| {
                if e.is_unauthorized() {
                    Redirect::temporary(LOGIN_PATH).into_response()
                } else {
                    ApiError::from(e).into_response()
                }
            })?
            .ok_or_else(|| {
                tracing::warn!("User {} has no usable profile", session.id);
                Redirect::temporary(LOGIN_PATH).into_response()
            })?;

        Ok(Viewer { session, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token=def"));
        assert_eq!(extract_token(&headers, "sb-access-token").as_deref(), Some("abc"));
    }

    #[test]
    fn test_cookie_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=def; lang=fr"),
        );
        assert_eq!(extract_token(&headers, "sb-access-token").as_deref(), Some("def"));
    }

    #[test]
    fn test_missing_or_empty_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers, "sb-access-token"), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token="));
        assert_eq!(extract_token(&headers, "sb-access-token"), None);
    }
}
