// handlers/protected/dashboard/assessments.rs - GET /dashboard/assessments

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handlers::or_empty;
use crate::handlers::views::{assessment_cards, AssessmentCard};
use crate::middleware::{ApiResponse, ApiResult, Viewer};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AssessmentsQuery {
    pub shop_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentList {
    pub shop_id: Option<Uuid>,
    pub total: usize,
    pub assessments: Vec<AssessmentCard>,
}

/// Newest first, optionally narrowed to one shop.
pub async fn assessments_get(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<AssessmentsQuery>,
) -> ApiResult<AssessmentList> {
    let assessments = or_empty(
        state.backend.assessments(viewer.token(), query.shop_id).await,
        "assessments",
    );

    Ok(ApiResponse::success(AssessmentList {
        shop_id: query.shop_id,
        total: assessments.len(),
        assessments: assessment_cards(&assessments),
    }))
}
