// handlers/views.rs - Response shapes shared by several handlers

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Assessment, AssessmentStatus, Role, Shop, UserContext};

/// Shown in place of a shop name when the assessment's shop is not visible.
pub const UNKNOWN_SHOP: &str = "Unknown shop";

#[derive(Debug, Serialize)]
pub struct ShopCard {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub location: String,
    pub is_monthly: bool,
    pub airport: Option<String>,
    pub audit_link: String,
}

impl From<&Shop> for ShopCard {
    fn from(shop: &Shop) -> Self {
        Self {
            id: shop.id,
            name: shop.name.clone(),
            brand: shop.brand.clone(),
            location: shop.location.clone(),
            is_monthly: shop.is_monthly(),
            airport: shop.airport_name().map(str::to_string),
            audit_link: format!("/audit/{}", shop.id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssessmentCard {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub shop_name: String,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub airport: Option<String>,
    pub status: AssessmentStatus,
    pub status_tone: &'static str,
    pub average_rating: Option<f64>,
    pub photo_count: usize,
    pub created_at: DateTime<Utc>,
    pub result_link: String,
}

impl From<&Assessment> for AssessmentCard {
    fn from(assessment: &Assessment) -> Self {
        let shop = assessment.shop.as_ref();

        Self {
            id: assessment.id,
            shop_id: assessment.shop_id,
            shop_name: shop.map_or_else(|| UNKNOWN_SHOP.to_string(), |s| s.name.clone()),
            brand: shop.map(|s| s.brand.clone()),
            location: shop.map(|s| s.location.clone()),
            airport: shop.and_then(Shop::airport_name).map(str::to_string),
            status: assessment.status.clone(),
            status_tone: assessment.status.tone(),
            average_rating: assessment.average_rating(),
            photo_count: assessment.photos().len(),
            created_at: assessment.created_at,
            result_link: format!("/result/{}", assessment.id),
        }
    }
}

pub fn assessment_cards(assessments: &[Assessment]) -> Vec<AssessmentCard> {
    assessments.iter().map(AssessmentCard::from).collect()
}

pub fn shop_cards(shops: &[Shop]) -> Vec<ShopCard> {
    shops.iter().map(ShopCard::from).collect()
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: Role,
}

impl From<&UserContext> for UserSummary {
    fn from(context: &UserContext) -> Self {
        Self {
            id: context.user_id,
            email: context.email.clone(),
            role: context.role,
        }
    }
}

/// Links available to the signed-in user.
#[derive(Debug, Serialize)]
pub struct Navigation {
    pub dashboard: &'static str,
    pub audit: Option<&'static str>,
    pub profile: &'static str,
    pub settings: &'static str,
    pub logout: &'static str,
}

impl Navigation {
    pub fn for_role(role: Role) -> Self {
        Self {
            dashboard: "/dashboard",
            audit: role.can_audit().then_some("/audit"),
            profile: "/profile",
            settings: "/settings",
            logout: "/logout",
        }
    }
}
