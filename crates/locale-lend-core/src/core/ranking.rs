//! Proximity Ranking Pipeline
//!
//! annotate distance -> filter (title prefix, category, radius) -> stable sort
//! (available first, then the sort key) -> optional page limit.
//!
//! Inputs are borrowed and never modified; the output holds annotated copies.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LendConfig;
use crate::core::geo::haversine_distance;
use crate::models::geo::GeoPoint;
use crate::models::item::{ItemCategory, ListableItem, SortKey, UnlocatedPolicy};

/// Ranking options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankOptions {
    /// Keep only items whose title starts with this text (case-sensitive)
    #[serde(default)]
    pub title_prefix: Option<String>,

    /// Keep only this category
    #[serde(default)]
    pub category: Option<ItemCategory>,

    /// Keep only items at most this far away
    #[serde(default)]
    pub max_distance_meters: Option<f64>,

    #[serde(default)]
    pub sort_key: SortKey,

    /// Page size; `None` returns everything
    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub unlocated: UnlocatedPolicy,
}

impl RankOptions {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            ..Default::default()
        }
    }

    /// Nearest-first within the configured search radius, one page.
    pub fn nearby(config: &LendConfig) -> Self {
        Self {
            title_prefix: None,
            category: None,
            max_distance_meters: Some(config.search_radius_meters),
            sort_key: SortKey::Distance,
            limit: Some(config.page_size),
            unlocated: config.unlocated_policy,
        }
    }

    /// Defaults for a search listing: configured sort key and page size,
    /// no radius.
    pub fn search(config: &LendConfig) -> Self {
        Self {
            title_prefix: None,
            category: None,
            max_distance_meters: None,
            sort_key: config.default_sort_key,
            limit: Some(config.page_size),
            unlocated: config.unlocated_policy,
        }
    }

    /// Title search. An empty query matches everything.
    pub fn title_prefix(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.title_prefix = (!query.is_empty()).then_some(query);
        self
    }

    pub fn category(mut self, category: ItemCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn within(mut self, meters: f64) -> Self {
        self.max_distance_meters = Some(meters);
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn unlocated(mut self, policy: UnlocatedPolicy) -> Self {
        self.unlocated = policy;
        self
    }
}

/// Copy `items` with `distance_meters` set relative to `reference`.
///
/// Unlocated items get 0 under `ZeroDistance` and are dropped under `Exclude`.
pub fn annotate_distances(
    items: &[ListableItem],
    reference: &GeoPoint,
    policy: UnlocatedPolicy,
) -> Vec<ListableItem> {
    items
        .iter()
        .filter_map(|item| {
            let distance = match (&item.location, policy) {
                (Some(location), _) => haversine_distance(reference, location),
                (None, UnlocatedPolicy::ZeroDistance) => 0.0,
                (None, UnlocatedPolicy::Exclude) => return None,
            };
            Some(ListableItem {
                distance_meters: Some(distance),
                ..item.clone()
            })
        })
        .collect()
}

/// Availability first, then the sort key.
pub fn compare_items(a: &ListableItem, b: &ListableItem, key: SortKey) -> Ordering {
    let availability = b.status.is_available().cmp(&a.status.is_available());
    if availability != Ordering::Equal {
        return availability;
    }

    match key {
        SortKey::Distance => {
            let da = a.distance_meters.unwrap_or(0.0);
            let db = b.distance_meters.unwrap_or(0.0);
            da.total_cmp(&db)
        }
        SortKey::Newest => b.created_at.cmp(&a.created_at),
        SortKey::Popular => b.borrow_count.cmp(&a.borrow_count),
    }
}

/// Rank `items` around `reference`.
pub fn rank_items(
    items: &[ListableItem],
    reference: &GeoPoint,
    options: &RankOptions,
) -> Vec<ListableItem> {
    let mut ranked: Vec<ListableItem> = annotate_distances(items, reference, options.unlocated)
        .into_iter()
        .filter(|item| {
            options
                .title_prefix
                .as_deref()
                .map_or(true, |prefix| item.title.starts_with(prefix))
        })
        .filter(|item| options.category.map_or(true, |c| item.category == c))
        .filter(|item| match options.max_distance_meters {
            Some(max) => item.distance_meters.unwrap_or(0.0) <= max,
            None => true,
        })
        .collect();

    // `sort_by` is stable, so ties keep their input order.
    ranked.sort_by(|a, b| compare_items(a, b, options.sort_key));

    if let Some(limit) = options.limit {
        ranked.truncate(limit);
    }

    debug!(
        input = items.len(),
        output = ranked.len(),
        sort_key = ?options.sort_key,
        "ranked items"
    );

    ranked
}

/// Human-readable distance label for a listing card.
pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        None => "Nearby".to_string(),
        Some(m) if m <= 0.0 => "Nearby".to_string(),
        Some(m) if m < 1000.0 => format!("{:.0}m away", m),
        Some(m) => format!("{:.1}km away", m / 1000.0),
    }
}
