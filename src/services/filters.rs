use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stats::{audited_shops, MonthWindow};
use crate::models::{Assessment, Shop};

/// Sentinel sent by clients for "no filter" on a select box.
const ALL: &str = "all";

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL)
}

/// Location/brand filter of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopFilter {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl ShopFilter {
    pub fn location(&self) -> Option<&str> {
        active(&self.location)
    }

    pub fn brand(&self) -> Option<&str> {
        active(&self.brand)
    }

    pub fn matches(&self, shop: &Shop) -> bool {
        self.location().map_or(true, |l| shop.location == l) && self.brand().map_or(true, |b| shop.brand == b)
    }
}

/// Shop selector filter: location, brand, and "still due this month".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorFilter {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub monthly: bool,
}

impl SelectorFilter {
    pub fn shop_filter(&self) -> ShopFilter {
        ShopFilter {
            location: self.location.clone(),
            brand: self.brand.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub brands: Vec<String>,
}

/// Distinct values in first-seen order.
pub fn distinct<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Dashboard options narrow each other: locations follow the active brand and
/// brands follow the active location.
pub fn dashboard_options(shops: &[Shop], filter: &ShopFilter) -> FilterOptions {
    let locations = distinct(
        shops
            .iter()
            .filter(|s| filter.brand().map_or(true, |b| s.brand == b))
            .map(|s| s.location.as_str()),
    );
    let brands = distinct(
        shops
            .iter()
            .filter(|s| filter.location().map_or(true, |l| s.location == l))
            .map(|s| s.brand.as_str()),
    );

    FilterOptions { locations, brands }
}

pub fn selector_options(shops: &[Shop]) -> FilterOptions {
    FilterOptions {
        locations: distinct(shops.iter().map(|s| s.location.as_str())),
        brands: distinct(shops.iter().map(|s| s.brand.as_str())),
    }
}

/// Shops matching the filter, and the assessments of those shops with their
/// shop attached. Assessments whose shop is unknown are dropped.
pub fn filter_dashboard(shops: &[Shop], assessments: &[Assessment], filter: &ShopFilter) -> (Vec<Shop>, Vec<Assessment>) {
    let by_id: HashMap<Uuid, &Shop> = shops.iter().map(|s| (s.id, s)).collect();

    let filtered_shops: Vec<Shop> = shops.iter().filter(|s| filter.matches(s)).cloned().collect();
    let kept: HashSet<Uuid> = filtered_shops.iter().map(|s| s.id).collect();

    let filtered_assessments = assessments
        .iter()
        .filter(|a| kept.contains(&a.shop_id))
        .filter_map(|a| {
            let shop = by_id.get(&a.shop_id)?;
            let mut joined = a.clone();
            joined.shop = Some((*shop).clone());
            Some(joined)
        })
        .collect();

    (filtered_shops, filtered_assessments)
}

pub fn select_shops(shops: &[Shop], assessments: &[Assessment], filter: &SelectorFilter, window: &MonthWindow) -> Vec<Shop> {
    let audited = audited_shops(assessments, window);
    let shop_filter = filter.shop_filter();

    shops
        .iter()
        .filter(|s| shop_filter.matches(s))
        .filter(|s| !filter.monthly || (s.is_monthly() && !audited.contains(&s.id)))
        .cloned()
        .collect()
}
