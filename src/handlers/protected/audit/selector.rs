// handlers/protected/audit/selector.rs - GET /audit

use axum::extract::{Query, State};
use serde::Serialize;

use crate::handlers::protected::shops_and_assessments;
use crate::handlers::views::{shop_cards, ShopCard};
use crate::middleware::{ApiResponse, ApiResult, Viewer};
use crate::services::filters::{select_shops, selector_options, FilterOptions, SelectorFilter};
use crate::services::stats::MonthWindow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShopSelector {
    pub filters: SelectorFilter,
    pub options: FilterOptions,
    pub shops: Vec<ShopCard>,
    pub back: &'static str,
}

/// GET /audit?location=&brand=&monthly=true
///
/// With `monthly` only shops flagged for monthly audits that have not been
/// audited yet this month are listed.
pub async fn audit_get(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(filter): Query<SelectorFilter>,
) -> ApiResult<ShopSelector> {
    let (shops, assessments) = shops_and_assessments(&state, viewer.token()).await;
    let window = MonthWindow::current(&state.config.stats);
    let selected = select_shops(&shops, &assessments, &filter, &window);

    tracing::debug!(
        "Shop selector for {}: {} of {} shops",
        viewer.session.id,
        selected.len(),
        shops.len()
    );

    Ok(ApiResponse::success(ShopSelector {
        options: selector_options(&shops),
        shops: shop_cards(&selected),
        filters: filter,
        back: "/dashboard",
    }))
}
