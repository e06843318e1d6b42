// handlers/protected/dashboard/super_admin.rs - GET /dashboard/super-admin

use std::collections::BTreeMap;

use axum::extract::State;
use serde::Serialize;

use crate::handlers::protected::shops_and_assessments;
use crate::middleware::{ApiResponse, ApiResult, Viewer};
use crate::models::{Assessment, Shop};
use crate::services::stats::{monthly_progress, MonthWindow, MonthlyProgress};
use crate::state::AppState;

/// Label for shops with no airport attached.
const NO_AIRPORT: &str = "Unassigned";

#[derive(Debug, Serialize)]
pub struct AirportTotals {
    pub airport: String,
    pub shops: usize,
    pub assessments: usize,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub total_shops: usize,
    pub monthly_shops: usize,
    pub total_assessments: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_airport: Vec<AirportTotals>,
    pub monthly: MonthlyProgress,
}

pub(crate) fn totals(shops: &[Shop], assessments: &[Assessment], window: &MonthWindow, target: Option<usize>) -> Overview {
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    for assessment in assessments {
        *by_status.entry(assessment.status.as_str().to_string()).or_default() += 1;
    }

    let mut airports: BTreeMap<String, AirportTotals> = BTreeMap::new();
    for shop in shops {
        let name = shop.airport_name().unwrap_or(NO_AIRPORT).to_string();
        let entry = airports.entry(name.clone()).or_insert_with(|| AirportTotals {
            airport: name,
            shops: 0,
            assessments: 0,
        });
        entry.shops += 1;
        entry.assessments += assessments.iter().filter(|a| a.shop_id == shop.id).count();
    }

    Overview {
        total_shops: shops.len(),
        monthly_shops: shops.iter().filter(|s| s.is_monthly()).count(),
        total_assessments: assessments.len(),
        by_status,
        by_airport: airports.into_values().collect(),
        monthly: monthly_progress(assessments, shops, window, target),
    }
}

/// Counts across every airport. Super users see all rows, so nothing is
/// filtered here.
pub async fn super_admin_get(State(state): State<AppState>, viewer: Viewer) -> ApiResult<Overview> {
    let (shops, assessments) = shops_and_assessments(&state, viewer.token()).await;
    let window = MonthWindow::current(&state.config.stats);

    Ok(ApiResponse::success(totals(
        &shops,
        &assessments,
        &window,
        state.config.stats.monthly_target,
    )))
}
