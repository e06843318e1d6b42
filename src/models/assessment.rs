use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::shop::Shop;

/// Lifecycle marker of an assessment. The backend owns the set of values, so
/// anything it returns outside the known four is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssessmentStatus {
    Open,
    Send,
    Finished,
    Reported,
    Other(String),
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AssessmentStatus::Open => "open",
            AssessmentStatus::Send => "send",
            AssessmentStatus::Finished => "finished",
            AssessmentStatus::Reported => "reported",
            AssessmentStatus::Other(s) => s,
        }
    }

    /// Finished and sent assessments both count as completed on the dashboard.
    pub fn is_completed(&self) -> bool {
        matches!(self, AssessmentStatus::Finished | AssessmentStatus::Send)
    }

    /// Display tone used by clients for the status badge.
    pub fn tone(&self) -> &'static str {
        match self {
            AssessmentStatus::Finished => "green",
            AssessmentStatus::Send | AssessmentStatus::Open => "yellow",
            AssessmentStatus::Reported => "red",
            AssessmentStatus::Other(_) => "gray",
        }
    }
}

impl Default for AssessmentStatus {
    fn default() -> Self {
        AssessmentStatus::Send
    }
}

impl From<String> for AssessmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => AssessmentStatus::Open,
            "send" => AssessmentStatus::Send,
            "finished" => AssessmentStatus::Finished,
            "reported" => AssessmentStatus::Reported,
            _ => AssessmentStatus::Other(value),
        }
    }
}

impl From<AssessmentStatus> for String {
    fn from(status: AssessmentStatus) -> Self {
        match status {
            AssessmentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a single audit question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Rating(f64),
    Text(String),
    Other(Value),
}

impl Answer {
    pub fn as_rating(&self) -> Option<f64> {
        match self {
            Answer::Rating(r) => Some(*r),
            _ => None,
        }
    }
}

/// Row of the `assessments` table, optionally with its shop embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub shop_id: Uuid,
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub photo_urls: Option<Vec<String>>,
    #[serde(default)]
    pub status: AssessmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, rename = "shops", skip_serializing_if = "Option::is_none")]
    pub shop: Option<Shop>,
}

impl Assessment {
    pub fn photos(&self) -> &[String] {
        self.photo_urls.as_deref().unwrap_or_default()
    }

    /// Mean of the numeric answers on the 1..=4 rating scale, one decimal.
    pub fn average_rating(&self) -> Option<f64> {
        let ratings: Vec<f64> = self
            .answers
            .values()
            .filter_map(Answer::as_rating)
            .filter(|r| (1.0..=4.0).contains(r))
            .collect();

        if ratings.is_empty() {
            return None;
        }

        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    }
}

/// Insert payload for the `assessments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssessment {
    pub shop_id: Uuid,
    pub answers: BTreeMap<String, Answer>,
    pub comments: Option<String>,
    pub photo_urls: Vec<String>,
    pub status: AssessmentStatus,
    pub created_at: DateTime<Utc>,
}
