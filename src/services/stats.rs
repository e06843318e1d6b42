use std::collections::HashSet;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::StatsConfig;
use crate::models::{Assessment, Shop};

/// Share of the target at which progress turns from red to orange.
const ORANGE_THRESHOLD: f64 = 0.3;

/// A calendar month as seen from a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    offset: FixedOffset,
}

impl MonthWindow {
    pub fn containing(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = now.with_timezone(&offset);
        Self {
            year: local.year(),
            month: local.month(),
            offset,
        }
    }

    /// The current month under the configured offset.
    pub fn current(config: &StatsConfig) -> Self {
        Self::containing(Utc::now(), offset_from_minutes(config.utc_offset_minutes))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let local = at.with_timezone(&self.offset);
        local.year() == self.year && local.month() == self.month
    }
}

/// Offset from a minute count; out-of-range values fall back to UTC.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Distinct shops with at least one assessment created inside `window`.
pub fn audited_shops(assessments: &[Assessment], window: &MonthWindow) -> HashSet<Uuid> {
    assessments
        .iter()
        .filter(|a| window.contains(a.created_at))
        .map(|a| a.shop_id)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTone {
    Red,
    Orange,
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyProgress {
    pub year: i32,
    pub month: u32,
    pub target: usize,
    pub audited: usize,
    pub remaining: usize,
    pub percent: u32,
    pub tone: ProgressTone,
}

/// Monthly audit completion.
///
/// Without an override the target is the number of shops flagged
/// `is_monthly`, and only those shops count as audited. With an override the
/// target is fixed and every audited shop counts.
pub fn monthly_progress(
    assessments: &[Assessment],
    shops: &[Shop],
    window: &MonthWindow,
    target_override: Option<usize>,
) -> MonthlyProgress {
    let audited_ids = audited_shops(assessments, window);

    let (target, audited) = match target_override {
        Some(target) => (target, audited_ids.len()),
        None => {
            let monthly: HashSet<Uuid> = shops.iter().filter(|s| s.is_monthly()).map(|s| s.id).collect();
            (monthly.len(), audited_ids.intersection(&monthly).count())
        }
    };

    let percent = if target > 0 {
        ((audited as f64 / target as f64) * 100.0).min(100.0).round() as u32
    } else {
        0
    };

    let tone = if audited >= target {
        ProgressTone::Green
    } else if audited as f64 >= target as f64 * ORANGE_THRESHOLD {
        ProgressTone::Orange
    } else {
        ProgressTone::Red
    };

    MonthlyProgress {
        year: window.year,
        month: window.month,
        target,
        audited,
        remaining: target.saturating_sub(audited),
        percent,
        tone,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub monthly: MonthlyProgress,
    pub completed_assessments: usize,
    pub total_assessments: usize,
    pub completion_rate: u32,
    pub total_shops: usize,
}

pub fn dashboard_stats(
    assessments: &[Assessment],
    shops: &[Shop],
    window: &MonthWindow,
    target_override: Option<usize>,
) -> DashboardStats {
    let completed = assessments.iter().filter(|a| a.status.is_completed()).count();
    let completion_rate = ((completed as f64 / assessments.len().max(1) as f64) * 100.0).round() as u32;

    DashboardStats {
        monthly: monthly_progress(assessments, shops, window, target_override),
        completed_assessments: completed,
        total_assessments: assessments.len(),
        completion_rate,
        total_shops: shops.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssessmentStatus;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn shop(monthly: bool) -> Shop {
        Shop {
            id: Uuid::new_v4(),
            name: "Shop".to_string(),
            brand: "Brand".to_string(),
            location: "T1".to_string(),
            contact_email: String::new(),
            is_monthly: Some(monthly),
            airport_id: None,
            airport: None,
            created_at: None,
        }
    }

    fn assessment(shop: &Shop, status: AssessmentStatus, at: DateTime<Utc>) -> Assessment {
        Assessment {
            id: Uuid::new_v4(),
            shop_id: shop.id,
            answers: BTreeMap::new(),
            comments: None,
            photo_urls: None,
            status,
            created_at: at,
            shop: None,
        }
    }

    fn october() -> MonthWindow {
        MonthWindow::containing(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(), Utc.fix())
    }

    #[test]
    fn test_window_respects_offset() {
        let paris = offset_from_minutes(120);
        let now = Utc.with_ymd_and_hms(2026, 10, 31, 23, 30, 0).unwrap();
        let window = MonthWindow::containing(now, paris);
        assert_eq!((window.year, window.month), (2026, 11));
        assert!(window.contains(Utc.with_ymd_and_hms(2026, 10, 31, 22, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2026, 10, 31, 21, 59, 0).unwrap()));
    }

    #[test]
    fn test_offset_out_of_range_falls_back_to_utc() {
        assert_eq!(offset_from_minutes(24 * 60 * 2), Utc.fix());
        assert_eq!(offset_from_minutes(i32::MAX), Utc.fix());
    }

    #[test]
    fn test_counts_distinct_monthly_shops() {
        let monthly_a = shop(true);
        let monthly_b = shop(true);
        let monthly_c = shop(true);
        let occasional = shop(false);
        let this_month = Utc.with_ymd_and_hms(2026, 10, 2, 8, 0, 0).unwrap();
        let last_month = Utc.with_ymd_and_hms(2026, 9, 28, 8, 0, 0).unwrap();

        let assessments = vec![
            assessment(&monthly_a, AssessmentStatus::Finished, this_month),
            assessment(&monthly_a, AssessmentStatus::Open, this_month),
            assessment(&monthly_b, AssessmentStatus::Finished, last_month),
            assessment(&occasional, AssessmentStatus::Finished, this_month),
        ];
        let shops = vec![monthly_a, monthly_b, monthly_c, occasional];

        let progress = monthly_progress(&assessments, &shops, &october(), None);
        assert_eq!(progress.target, 3);
        assert_eq!(progress.audited, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(progress.percent, 33);
        assert_eq!(progress.tone, ProgressTone::Orange);
    }

    #[test]
    fn test_override_counts_every_audited_shop() {
        let a = shop(false);
        let b = shop(false);
        let now = Utc.with_ymd_and_hms(2026, 10, 5, 8, 0, 0).unwrap();
        let assessments = vec![
            assessment(&a, AssessmentStatus::Send, now),
            assessment(&b, AssessmentStatus::Send, now),
        ];

        let progress = monthly_progress(&assessments, &[a, b], &october(), Some(10));
        assert_eq!(progress.target, 10);
        assert_eq!(progress.audited, 2);
        assert_eq!(progress.percent, 20);
        assert_eq!(progress.tone, ProgressTone::Red);
        assert_eq!(progress.remaining, 8);
    }

    #[test]
    fn test_zero_target_is_green_at_zero_percent() {
        let progress = monthly_progress(&[], &[shop(false)], &october(), None);
        assert_eq!(progress.target, 0);
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.tone, ProgressTone::Green);
        assert_eq!(progress.remaining, 0);
    }

    #[test]
    fn test_percent_is_capped() {
        let a = shop(false);
        let b = shop(false);
        let now = Utc.with_ymd_and_hms(2026, 10, 5, 8, 0, 0).unwrap();
        let assessments = vec![
            assessment(&a, AssessmentStatus::Send, now),
            assessment(&b, AssessmentStatus::Send, now),
        ];

        let progress = monthly_progress(&assessments, &[a, b], &october(), Some(1));
        assert_eq!(progress.percent, 100);
        assert_eq!(progress.remaining, 0);
        assert_eq!(progress.tone, ProgressTone::Green);
    }

    #[test]
    fn test_completion_rate() {
        let s = shop(true);
        let now = Utc.with_ymd_and_hms(2026, 10, 5, 8, 0, 0).unwrap();
        let assessments = vec![
            assessment(&s, AssessmentStatus::Finished, now),
            assessment(&s, AssessmentStatus::Send, now),
            assessment(&s, AssessmentStatus::Reported, now),
        ];

        let stats = dashboard_stats(&assessments, &[s], &october(), None);
        assert_eq!(stats.completed_assessments, 2);
        assert_eq!(stats.total_assessments, 3);
        assert_eq!(stats.completion_rate, 67);
        assert_eq!(stats.total_shops, 1);
        assert_eq!(stats.monthly.percent, 100);

        let empty = dashboard_stats(&[], &[], &october(), None);
        assert_eq!(empty.completion_rate, 0);
    }
}
