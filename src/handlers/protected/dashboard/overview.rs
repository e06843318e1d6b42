// handlers/protected/dashboard/overview.rs - GET /dashboard

use axum::extract::{Query, State};
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::or_empty;
use crate::handlers::protected::shops_and_assessments;
use crate::handlers::views::{assessment_cards, AssessmentCard, Navigation, UserSummary};
use crate::middleware::{ApiResponse, ApiResult, Viewer};
use crate::models::{Assessment, Role, Shop};
use crate::services::filters::{dashboard_options, filter_dashboard, FilterOptions, ShopFilter};
use crate::services::stats::{dashboard_stats, DashboardStats, MonthWindow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub user: UserSummary,
    pub navigation: Navigation,
    pub view: DashboardView,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardView {
    /// Airport managers and super users: statistics over the filtered shops.
    Overview {
        filters: ShopFilter,
        options: FilterOptions,
        stats: DashboardStats,
        assessments: Vec<AssessmentCard>,
    },
    /// Shop owners: results of their own shops.
    ShopOwner { assessments: Vec<AssessmentCard> },
    /// Airport workers: shops a dispute can be filed against.
    Worker {
        shops: Vec<ShopChoice>,
        litige_endpoint: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct ShopChoice {
    pub id: Uuid,
    pub name: String,
    pub location: String,
}

pub(crate) fn overview(
    shops: &[Shop],
    assessments: &[Assessment],
    filter: ShopFilter,
    window: &MonthWindow,
    target_override: Option<usize>,
) -> DashboardView {
    let (shown_shops, shown_assessments) = filter_dashboard(shops, assessments, &filter);

    DashboardView::Overview {
        options: dashboard_options(shops, &filter),
        stats: dashboard_stats(&shown_assessments, &shown_shops, window, target_override),
        assessments: assessment_cards(&shown_assessments),
        filters: filter,
    }
}

/// GET /dashboard?location=&brand=
pub async fn dashboard_get(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(filter): Query<ShopFilter>,
) -> ApiResult<DashboardPage> {
    let token = viewer.token();
    let role = viewer.context.role;

    let view = match role {
        Role::SuperUser | Role::AirportManager => {
            let (shops, assessments) = shops_and_assessments(&state, token).await;
            let window = MonthWindow::current(&state.config.stats);
            overview(&shops, &assessments, filter, &window, state.config.stats.monthly_target)
        }
        Role::ShopOwner => {
            let assessments = or_empty(state.backend.assessments(token, None).await, "assessments");
            DashboardView::ShopOwner {
                assessments: assessment_cards(&assessments),
            }
        }
        Role::AirportWorker => {
            let shops = or_empty(state.backend.shops(token).await, "shops");
            DashboardView::Worker {
                shops: shops
                    .iter()
                    .map(|s| ShopChoice {
                        id: s.id,
                        name: s.name.clone(),
                        location: s.location.clone(),
                    })
                    .collect(),
                litige_endpoint: "/litige",
            }
        }
    };

    Ok(ApiResponse::success(DashboardPage {
        user: UserSummary::from(&viewer.context),
        navigation: Navigation::for_role(role),
        view,
    }))
}
