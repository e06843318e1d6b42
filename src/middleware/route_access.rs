use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use super::auth::authenticate;
use crate::models::{Role, UserContext};
use crate::services::context::user_context;
use crate::state::AppState;

pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_ID_HEADER: &str = "x-user-id";

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Paths reachable without a session.
pub const PUBLIC_ROUTES: &[&str] = &[LOGIN_PATH, SIGNUP_PATH, "/"];

/// Role-gated path prefixes. Matching is a plain string prefix test and the
/// first matching entry wins.
///
/// `/dashboard/` comes before the narrower dashboard entries, so it decides
/// every dashboard sub-page except `/dashboard/super-admin`. The narrower
/// entries never match and shop owners reach `/dashboard/shops` and
/// `/dashboard/analytics`.
pub const PROTECTED_ROUTES: &[(&str, &[Role])] = &[
    ("/dashboard/super-admin", &[Role::SuperUser]),
    ("/audit", &[Role::AirportManager, Role::SuperUser]),
    ("/dashboard/", &[Role::ShopOwner, Role::AirportManager, Role::SuperUser]),
    ("/dashboard/assessments", &[Role::ShopOwner, Role::AirportManager, Role::SuperUser]),
    ("/dashboard/shops", &[Role::AirportManager, Role::SuperUser]),
    ("/dashboard/analytics", &[Role::AirportManager, Role::SuperUser]),
    ("/litige", &[Role::AirportWorker, Role::AirportManager, Role::SuperUser]),
];

/// Who is asking. `role` is only resolved for protected paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    SignedIn { role: Option<Role> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin { from: String },
    RedirectToDashboard,
    Unauthorized,
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_ROUTES
        .iter()
        .any(|route| path == *route || path.starts_with(&format!("{}/", route)))
}

/// Roles allowed on `path`, or `None` when the path is not role-gated.
pub fn required_roles(path: &str) -> Option<&'static [Role]> {
    PROTECTED_ROUTES
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map(|(_, roles)| *roles)
}

pub fn decide(path: &str, identity: &Identity) -> AccessDecision {
    let required = required_roles(path);

    match identity {
        Identity::Anonymous => match required {
            Some(_) if !is_public(path) => AccessDecision::RedirectToLogin { from: path.to_string() },
            _ => AccessDecision::Allow,
        },
        Identity::SignedIn { role } => {
            if path == LOGIN_PATH || path == SIGNUP_PATH {
                return AccessDecision::RedirectToDashboard;
            }

            match (required, role) {
                (None, _) => AccessDecision::Allow,
                (Some(roles), Some(role)) if roles.contains(role) => AccessDecision::Allow,
                (Some(_), _) => AccessDecision::Unauthorized,
            }
        }
    }
}

pub fn login_redirect_target(from: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirectedFrom", from)
        .finish();
    format!("{}?{}", LOGIN_PATH, query)
}

/// Session and role gate applied to every route.
///
/// On success the session is attached to the request, and on protected paths
/// the resolved [`UserContext`] plus the `x-user-role` / `x-user-id` headers
/// are forwarded as well.
pub async fn route_access_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    // Identity headers are only ever set here
    request.headers_mut().remove(USER_ROLE_HEADER);
    request.headers_mut().remove(USER_ID_HEADER);

    let path = request.uri().path().to_string();
    let session = authenticate(request.headers(), &state).await;

    let mut context: Option<UserContext> = None;
    let identity = match &session {
        None => Identity::Anonymous,
        Some(user) if required_roles(&path).is_some() => {
            context = match user_context(state.backend.as_ref(), user).await {
                Ok(ctx) => ctx,
                Err(e) => {
                    tracing::error!("Profile lookup failed for user {}: {}", user.id, e);
                    None
                }
            };
            Identity::SignedIn {
                role: context.as_ref().map(|ctx| ctx.role),
            }
        }
        Some(_) => Identity::SignedIn { role: None },
    };

    let decision = decide(&path, &identity);
    tracing::debug!("Access decision for {} ({:?}): {:?}", path, identity, decision);

    match decision {
        AccessDecision::Allow => {
            if let Some(ctx) = context {
                if let Ok(value) = HeaderValue::from_str(ctx.role.as_str()) {
                    request.headers_mut().insert(USER_ROLE_HEADER, value);
                }
                if let Ok(value) = HeaderValue::from_str(&ctx.user_id.to_string()) {
                    request.headers_mut().insert(USER_ID_HEADER, value);
                }
                request.extensions_mut().insert(ctx);
            }
            if let Some(user) = session {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        AccessDecision::RedirectToLogin { from } => Redirect::temporary(&login_redirect_target(&from)).into_response(),
        // A 307 would replay a form POST against the dashboard
        AccessDecision::RedirectToDashboard if request.method() == Method::GET || request.method() == Method::HEAD => {
            Redirect::temporary(DASHBOARD_PATH).into_response()
        }
        AccessDecision::RedirectToDashboard => Redirect::to(DASHBOARD_PATH).into_response(),
        AccessDecision::Unauthorized => {
            tracing::warn!(
                "Denied {} for user {:?} with role {:?}",
                path,
                session.as_ref().map(|u| u.id),
                identity
            );
            Redirect::temporary(UNAUTHORIZED_PATH).into_response()
        }
    }
}
