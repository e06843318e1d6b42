// handlers/protected/litige.rs - POST /litige

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::is_photo_reference;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Viewer};
use crate::models::{Litige, NewLitige};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SubmitLitige {
    #[serde(default)]
    pub shop_id: Option<Uuid>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
}

impl SubmitLitige {
    fn into_new(self) -> Result<NewLitige, ApiError> {
        let shop_id = self
            .shop_id
            .ok_or_else(|| ApiError::field_error("shop_id", "Please select a shop"))?;

        let photos: Vec<String> = self
            .photos
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if let Some(bad) = photos.iter().find(|photo| !is_photo_reference(photo)) {
            return Err(ApiError::field_error("photos", format!("Not a photo URL: {}", bad)));
        }

        Ok(NewLitige {
            shop_id,
            comment: self.comment.map(|c| c.trim().to_string()).unwrap_or_default(),
            photos,
            created_at: Utc::now(),
        })
    }
}

/// File a dispute against a shop. Responds 201 with the stored row.
pub async fn litige_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(body): Json<SubmitLitige>,
) -> ApiResult<Litige> {
    let new = body.into_new()?;

    let stored = state.backend.insert_litige(viewer.token(), &new).await.map_err(|e| {
        tracing::error!("Error saving litige for shop {}: {}", new.shop_id, e);
        ApiError::from(e)
    })?;
    tracing::info!("Litige filed against shop {} by {}", new.shop_id, viewer.session.id);

    Ok(ApiResponse::created(stored))
}
