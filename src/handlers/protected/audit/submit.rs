// handlers/protected/audit/submit.rs - POST /audit/:shop_id

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::find_shop;
use crate::handlers::protected::is_photo_reference;
use crate::error::ApiError;
use crate::handlers::or_empty;
use crate::handlers::views::AssessmentCard;
use crate::middleware::{ApiResponse, ApiResult, Viewer};
use crate::models::{Answer, AssessmentStatus, NewAssessment};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitAssessment {
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub photo_urls: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<AssessmentStatus>,
}

#[derive(Debug, Serialize)]
pub struct Submitted {
    pub assessment: AssessmentCard,
    pub redirect_to: String,
}

pub(crate) fn validate(body: &SubmitAssessment) -> Result<(), ApiError> {
    if body.answers.is_empty() {
        return Err(ApiError::field_error("answers", "At least one answer is required"));
    }
    if body.answers.keys().any(|question| question.trim().is_empty()) {
        return Err(ApiError::field_error("answers", "Question keys must not be empty"));
    }
    if let Some(status) = &body.status {
        if !matches!(status, AssessmentStatus::Open | AssessmentStatus::Send) {
            return Err(ApiError::field_error("status", "Status must be 'open' or 'send'"));
        }
    }
    if let Some(bad) = body
        .photo_urls
        .iter()
        .flatten()
        .find(|photo| !is_photo_reference(photo))
    {
        return Err(ApiError::field_error("photo_urls", format!("Not a photo URL: {}", bad)));
    }
    Ok(())
}

/// Record an assessment for a visible shop. Responds 201 with the stored row.
pub async fn audit_shop_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(shop_id): Path<String>,
    Json(body): Json<SubmitAssessment>,
) -> ApiResult<Submitted> {
    validate(&body)?;

    let shops = or_empty(state.backend.shops(viewer.token()).await, "shops");
    let shop = find_shop(shops, &shop_id).ok_or_else(|| ApiError::not_found("Shop not found"))?;

    let new = NewAssessment {
        shop_id: shop.id,
        answers: body.answers,
        comments: body.comments.filter(|c| !c.trim().is_empty()),
        photo_urls: body.photo_urls.unwrap_or_default(),
        status: body.status.unwrap_or_default(),
        created_at: Utc::now(),
    };

    let mut stored = state
        .backend
        .insert_assessment(viewer.token(), &new)
        .await
        .map_err(|e| {
            tracing::error!("Error saving assessment for shop {}: {}", shop.id, e);
            ApiError::from(e)
        })?;
    tracing::info!(
        "Assessment {} recorded for shop {} by {}",
        stored.id,
        shop.id,
        viewer.session.id
    );

    stored.shop = Some(shop);
    Ok(ApiResponse::created(Submitted {
        redirect_to: format!("/result/{}", stored.id),
        assessment: AssessmentCard::from(&stored),
    }))
}
