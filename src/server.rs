use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::route_access_middleware;
use crate::state::AppState;

/// The full application router. Every route, the fallback included, sits
/// behind the route access middleware.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Public
        .merge(public_routes())
        // Signed-in
        .merge(dashboard_routes())
        .merge(audit_routes())
        .merge(account_routes())
        .fallback(public::not_found)
        // Global middleware
        .layer(middleware::from_fn_with_state(state.clone(), route_access_middleware))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs)))
        .layer(cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", get(public::login_get).post(public::login_post))
        .route("/signup", get(public::signup_get).post(public::signup_post))
        .route("/logout", post(public::logout_post))
        .route("/refresh", post(public::refresh_post))
        .route("/unauthorized", get(public::unauthorized))
        .route("/not-found", get(public::not_found))
}

fn dashboard_routes() -> Router<AppState> {
    use protected::dashboard;

    Router::new()
        .route("/dashboard", get(dashboard::dashboard_get))
        .route("/dashboard/assessments", get(dashboard::assessments_get))
        .route("/dashboard/shops", get(dashboard::shops_get))
        .route("/dashboard/analytics", get(dashboard::analytics_get))
        .route("/dashboard/super-admin", get(dashboard::super_admin_get))
}

fn audit_routes() -> Router<AppState> {
    use protected::{audit, litige, result};

    Router::new()
        .route("/audit", get(audit::audit_get))
        .route("/audit/:shop_id", get(audit::audit_shop_get).post(audit::audit_shop_post))
        .route("/litige", post(litige::litige_post))
        .route("/result/:id", get(result::result_get))
}

fn account_routes() -> Router<AppState> {
    use protected::account;

    Router::new()
        .route("/profile", get(account::profile_get))
        .route("/settings", get(account::settings_get))
}

/// Browser clients send the session cookie, so origins are listed explicitly.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
