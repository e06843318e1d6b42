// handlers/protected/result.rs - GET /result/:id

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::views::{ShopCard, UNKNOWN_SHOP};
use crate::middleware::{ApiResponse, Viewer};
use crate::models::{Answer, Assessment, AssessmentStatus};
use crate::state::AppState;

const NOT_FOUND_PATH: &str = "/not-found";

#[derive(Debug, Serialize)]
pub struct AnswerLine {
    pub question: String,
    pub answer: Answer,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResult {
    pub id: Uuid,
    pub shop_name: String,
    pub shop: Option<ShopCard>,
    pub status: AssessmentStatus,
    pub status_tone: &'static str,
    pub created_at: DateTime<Utc>,
    pub average_rating: Option<f64>,
    pub answers: Vec<AnswerLine>,
    pub comments: Option<String>,
    pub photos: Vec<String>,
    pub back: &'static str,
}

impl From<Assessment> for AssessmentResult {
    fn from(assessment: Assessment) -> Self {
        let shop = assessment.shop.as_ref().map(ShopCard::from);

        Self {
            id: assessment.id,
            shop_name: shop.as_ref().map_or_else(|| UNKNOWN_SHOP.to_string(), |s| s.name.clone()),
            status_tone: assessment.status.tone(),
            average_rating: assessment.average_rating(),
            photos: assessment.photos().to_vec(),
            created_at: assessment.created_at,
            answers: assessment
                .answers
                .into_iter()
                .map(|(question, answer)| AnswerLine { question, answer })
                .collect(),
            comments: assessment.comments,
            status: assessment.status,
            shop,
            back: "/dashboard",
        }
    }
}

/// Detail of one assessment. Missing, invisible and malformed ids all end on
/// the not-found page.
pub async fn result_get(State(state): State<AppState>, viewer: Viewer, Path(id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Redirect::temporary(NOT_FOUND_PATH).into_response();
    };

    match state.backend.assessment(viewer.token(), id).await {
        Ok(Some(assessment)) => ApiResponse::success(AssessmentResult::from(assessment)).into_response(),
        Ok(None) => Redirect::temporary(NOT_FOUND_PATH).into_response(),
        Err(e) => {
            tracing::error!("Error fetching assessment {}: {}", id, e);
            Redirect::temporary(NOT_FOUND_PATH).into_response()
        }
    }
}
