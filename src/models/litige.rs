use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the `litige` table: a dispute raised by airport staff about a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Litige {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub shop_id: Uuid,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLitige {
    pub shop_id: Uuid,
    pub comment: String,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}
