// handlers/protected/audit/shop.rs - GET /audit/:shop_id

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use super::find_shop;
use crate::handlers::or_empty;
use crate::handlers::views::{assessment_cards, AssessmentCard, ShopCard};
use crate::middleware::{ApiResponse, Viewer};
use crate::state::AppState;

const SELECTOR_PATH: &str = "/audit";

#[derive(Debug, Serialize)]
pub struct AuditForm {
    pub shop: ShopCard,
    pub submit: String,
    pub statuses: [&'static str; 2],
    pub previous: Vec<AssessmentCard>,
}

/// Form target for one shop, with the shop's earlier assessments.
///
/// Unknown shops and malformed ids send the user back to the selector.
pub async fn audit_shop_get(State(state): State<AppState>, viewer: Viewer, Path(shop_id): Path<String>) -> Response {
    let shops = or_empty(state.backend.shops(viewer.token()).await, "shops");

    let Some(shop) = find_shop(shops, &shop_id) else {
        tracing::debug!("Audit requested for unknown shop {}", shop_id);
        return Redirect::temporary(SELECTOR_PATH).into_response();
    };

    let previous = or_empty(
        state.backend.assessments(viewer.token(), Some(shop.id)).await,
        "assessments",
    );

    ApiResponse::success(AuditForm {
        submit: format!("/audit/{}", shop.id),
        shop: ShopCard::from(&shop),
        statuses: ["open", "send"],
        previous: assessment_cards(&previous),
    })
    .into_response()
}
