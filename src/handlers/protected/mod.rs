// handlers/protected/mod.rs - Handlers that need a signed-in user
//
// Every handler here takes a `Viewer`, which redirects to /login when there
// is no session or the session has no usable profile. Role checks for the
// gated prefixes already happened in the route access middleware.

pub mod account; // GET /profile, GET /settings
pub mod audit; // GET /audit, GET|POST /audit/:shop_id
pub mod dashboard; // GET /dashboard and its sub-pages
pub mod litige; // POST /litige
pub mod result; // GET /result/:id

use url::Url;

use crate::handlers::or_empty;
use crate::models::{Assessment, Shop};
use crate::state::AppState;

/// Visible shops and assessments, fetched concurrently.
pub(crate) async fn shops_and_assessments(state: &AppState, token: &str) -> (Vec<Shop>, Vec<Assessment>) {
    let (shops, assessments) = futures::join!(state.backend.shops(token), state.backend.assessments(token, None));

    (or_empty(shops, "shops"), or_empty(assessments, "assessments"))
}

/// Photos are stored elsewhere; only web URLs and inline images are accepted.
pub(crate) fn is_photo_reference(value: &str) -> bool {
    if value.starts_with("data:image/") {
        return true;
    }
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
