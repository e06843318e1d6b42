// handlers/protected/dashboard/analytics.rs - GET /dashboard/analytics

use axum::extract::{Query, State};
use serde::Serialize;

use crate::handlers::protected::shops_and_assessments;
use crate::middleware::{ApiResponse, ApiResult, Viewer};
use crate::services::filters::{dashboard_options, filter_dashboard, FilterOptions, ShopFilter};
use crate::services::stats::{dashboard_stats, DashboardStats, MonthWindow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub filters: ShopFilter,
    pub options: FilterOptions,
    pub stats: DashboardStats,
}

/// GET /dashboard/analytics?location=&brand=
pub async fn analytics_get(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(filter): Query<ShopFilter>,
) -> ApiResult<Analytics> {
    let (shops, assessments) = shops_and_assessments(&state, viewer.token()).await;
    let (shown_shops, shown_assessments) = filter_dashboard(&shops, &assessments, &filter);
    let window = MonthWindow::current(&state.config.stats);

    Ok(ApiResponse::success(Analytics {
        options: dashboard_options(&shops, &filter),
        stats: dashboard_stats(
            &shown_assessments,
            &shown_shops,
            &window,
            state.config.stats.monthly_target,
        ),
        filters: filter,
    }))
}
