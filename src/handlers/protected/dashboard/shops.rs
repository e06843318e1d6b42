// handlers/protected/dashboard/shops.rs - GET /dashboard/shops

use std::collections::HashMap;

use axum::extract::{Query, State};
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::protected::shops_and_assessments;
use crate::handlers::views::ShopCard;
use crate::middleware::{ApiResponse, ApiResult, Viewer};
use crate::models::{Assessment, Shop};
use crate::services::filters::{dashboard_options, FilterOptions, ShopFilter};
use crate::services::stats::{audited_shops, MonthWindow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShopRow {
    #[serde(flatten)]
    pub shop: ShopCard,
    pub assessment_count: usize,
    pub audited_this_month: bool,
}

#[derive(Debug, Serialize)]
pub struct ShopList {
    pub filters: ShopFilter,
    pub options: FilterOptions,
    pub shops: Vec<ShopRow>,
}

pub(crate) fn shop_rows(shops: &[Shop], assessments: &[Assessment], filter: &ShopFilter, window: &MonthWindow) -> Vec<ShopRow> {
    let audited = audited_shops(assessments, window);
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for assessment in assessments {
        *counts.entry(assessment.shop_id).or_default() += 1;
    }

    shops
        .iter()
        .filter(|s| filter.matches(s))
        .map(|s| ShopRow {
            shop: ShopCard::from(s),
            assessment_count: counts.get(&s.id).copied().unwrap_or(0),
            audited_this_month: audited.contains(&s.id),
        })
        .collect()
}

/// GET /dashboard/shops?location=&brand=
pub async fn shops_get(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(filter): Query<ShopFilter>,
) -> ApiResult<ShopList> {
    let (shops, assessments) = shops_and_assessments(&state, viewer.token()).await;
    let window = MonthWindow::current(&state.config.stats);

    Ok(ApiResponse::success(ShopList {
        options: dashboard_options(&shops, &filter),
        shops: shop_rows(&shops, &assessments, &filter, &window),
        filters: filter,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssessmentStatus;
    use chrono::{Offset, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn shop(location: &str) -> Shop {
        Shop {
            id: Uuid::new_v4(),
            name: format!("Shop {}", location),
            brand: "Relay".to_string(),
            location: location.to_string(),
            contact_email: String::new(),
            is_monthly: Some(true),
            airport_id: None,
            airport: None,
            created_at: None,
        }
    }

    #[test]
    fn test_rows_count_and_flag_audits() {
        let t1 = shop("T1");
        let t2 = shop("T2");
        let at = |month| Utc.with_ymd_and_hms(2026, month, 4, 9, 0, 0).unwrap();
        let assessments: Vec<Assessment> = [(t1.id, 10), (t1.id, 9), (t2.id, 9)]
            .into_iter()
            .map(|(shop_id, month)| Assessment {
                id: Uuid::new_v4(),
                shop_id,
                answers: BTreeMap::new(),
                comments: None,
                photo_urls: None,
                status: AssessmentStatus::Finished,
                created_at: at(month),
                shop: None,
            })
            .collect();
        let window = MonthWindow::containing(at(10), Utc.fix());

        let rows = shop_rows(&[t1.clone(), t2.clone()], &assessments, &ShopFilter::default(), &window);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].assessment_count, 2);
        assert!(rows[0].audited_this_month);
        assert_eq!(rows[1].assessment_count, 1);
        assert!(!rows[1].audited_this_month);

        let filter = ShopFilter {
            location: Some("T2".to_string()),
            brand: None,
        };
        let rows = shop_rows(&[t1, t2.clone()], &assessments, &filter, &window);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].shop.id, t2.id);
    }
}
