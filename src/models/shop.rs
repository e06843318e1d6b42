use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Row of the `shops` table, optionally with its airport embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub is_monthly: Option<bool>,
    #[serde(default)]
    pub airport_id: Option<Uuid>,
    #[serde(default, rename = "airports", skip_serializing_if = "Option::is_none")]
    pub airport: Option<Airport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Shop {
    /// Shops expected to be audited every calendar month.
    pub fn is_monthly(&self) -> bool {
        self.is_monthly.unwrap_or(false)
    }

    pub fn airport_name(&self) -> Option<&str> {
        self.airport.as_ref().map(|a| a.name.as_str())
    }
}
